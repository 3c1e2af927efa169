//! Prompt assembly from the current record snapshot.

use rosterhub_core::record::StudentRecord;

/// A system/user prompt pair ready to hand to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds grounded prompts from a question and a record snapshot.
///
/// Pure and deterministic: the same question and snapshot always produce the
/// same prompt pair. Snapshots larger than `record_cap` are truncated, and
/// the truncation is stated in the prompt so the model does not compute
/// dataset-wide aggregates from a partial view.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    record_cap: usize,
}

impl PromptBuilder {
    pub fn new(record_cap: usize) -> Self {
        Self { record_cap }
    }

    pub fn build(&self, question: &str, records: &[StudentRecord]) -> Prompt {
        let total = records.len();
        let included = total.min(self.record_cap);
        let truncated = included < total;

        // to_string_pretty on a slice of plain structs cannot fail
        let data = serde_json::to_string_pretty(&records[..included])
            .unwrap_or_else(|_| "[]".to_string());

        let data_label = if truncated {
            format!("Student dataset (JSON array, first {included} of {total} records):")
        } else {
            format!("Student dataset (JSON array, all {total} records):")
        };

        let mut system = String::from(
            "You are an assistant for a student information system. \
             Answer strictly based on the student data provided in the user message.\n\
             Rules:\n\
             - If a requested field is not present in the data, say it is not available.\n\
             - For counts, compute exactly from the dataset.\n\
             - For lists, return only the exact matching records from the dataset, \
             as short readable bulleted items.\n\
             - If the dataset is empty, say so.\n\
             - Be concise and accurate. If the question is unclear, ask a brief \
             clarifying question.",
        );
        if truncated {
            system.push_str(
                "\n- The dataset shown is a partial view. Do not compute totals, \
                 averages, or other dataset-wide aggregates; instead say the full \
                 dataset is not available.",
            );
        }

        let user = format!("{data_label}\n{data}\n\nUser question:\n{question}");

        Prompt { system, user }
    }
}
