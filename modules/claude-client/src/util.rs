/// Remove surrounding markdown fences from a model response, if present.
/// Models often wrap JSON output in ```json blocks despite instructions.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
