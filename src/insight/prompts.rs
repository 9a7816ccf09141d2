//! Prompt construction for insight synthesis.

use super::provider::InsightRequest;

/// Build the synthesis prompt sent to the model.
pub fn build_insight_prompt(request: &InsightRequest) -> String {
    format!(
        "Analyze the following quantum manifestation state based on Dr. Joe Dispenza's work:\n\
         \n\
         INTENTIONS (Thoughts): {intentions}\n\
         ELEVATED EMOTIONS (Feelings): {emotions}\n\
         POTENTIAL SYMBOL: {symbol}\n\
         \n\
         IMPORTANT: Provide the response in {language}.\n\
         \n\
         Please provide:\n\
         1. A 'Quantum Signature' (a short poetic synthesis phrase).\n\
         2. A brief description of how these forces are collapsing the wave function.\n\
         3. A 'Coherence Score' from 0 to 100 based on compatibility.\n",
        intentions = request.intentions.join(", "),
        emotions = request.emotions.join(", "),
        symbol = request.symbol,
        language = request.language_name,
    )
}

/// JSON schema the model must answer with.
pub fn insight_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Quantum Signature / Poetic Title" },
            "description": { "type": "STRING", "description": "Analysis of the alignment" },
            "alignmentScore": { "type": "INTEGER", "description": "Coherence score 0-100" }
        },
        "required": ["title", "description", "alignmentScore"]
    })
}
