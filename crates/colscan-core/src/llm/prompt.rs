//! Prompt construction

/// System instruction constraining the answer to `labels`
pub fn system_prompt(labels: &[String]) -> String {
    format!(
        "You are a concise data classifier. Given a database column name and up to a few \
         sample values, respond with exactly one of the following labels and no other text: {}.",
        labels.join(", ")
    )
}

/// User message carrying the column name and its samples, one per line
pub fn user_prompt(column_name: &str, samples: &[String]) -> String {
    let mut prompt = format!("Column: {}\nSamples:", column_name);
    for sample in samples {
        prompt.push_str("\n- ");
        prompt.push_str(sample.trim());
    }
    prompt
}
