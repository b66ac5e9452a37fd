//! Request construction and response parsing for the analysis model.

use serde_json::{Value, json};

use crate::{AnalysisError, AnalysisResult};

/// Build the generateContent request body for one movie description.
pub fn build_request_body(description: &str) -> Value {
    let text = format!(
        r#"Analyze this movie request: "{description}"
Output a structured JSON with these fields only:
1. genres: An array of likely genres
2. era: Time period if mentioned (e.g. "90s", "modern", "80s sci-fi")
3. mood: The emotional tone (e.g. "funny", "thrilling", "romantic")
4. keywords: Important descriptive words for search
5. searchQuery: A refined search query for IMDB

Only return valid JSON with these fields - no extra text."#
    );

    json!({
        "contents": [
            { "parts": [ { "text": text } ] }
        ],
        "generationConfig": {
            "temperature": 0.2,
            "maxOutputTokens": 1000
        }
    })
}

/// The model's text from `candidates[0].content.parts[0].text`.
pub fn generated_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|t| !t.is_empty())
}

/// Span from the first `{` to the last `}`; models often wrap JSON in prose
/// or markdown fences.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the model's text into an analysis. `searchQuery` is mandatory;
/// every other field is optional and non-string list entries are dropped.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let raw = extract_json_object(text).ok_or(AnalysisError::NoJson)?;
    let data: Value = serde_json::from_str(raw).map_err(|_| AnalysisError::InvalidJson)?;

    let search_query = data["searchQuery"]
        .as_str()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(AnalysisError::MissingSearchQuery)?
        .to_string();

    Ok(AnalysisResult {
        genres: string_list(&data["genres"]),
        era: non_empty(&data["era"]),
        mood: non_empty(&data["mood"]),
        keywords: string_list(&data["keywords"]),
        search_query,
    })
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(non_empty).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_embeds_description() {
        let body = build_request_body("Interstellar but funnier");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"Interstellar but funnier\""));
        assert!(text.contains("searchQuery"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn generated_text_requires_full_envelope() {
        let ok = json!({ "candidates": [ { "content": { "parts": [ { "text": "{}" } ] } } ] });
        assert_eq!(generated_text(&ok), Some("{}"));

        let no_parts = json!({ "candidates": [ { "content": {} } ] });
        assert_eq!(generated_text(&no_parts), None);
        assert_eq!(generated_text(&json!({ "promptFeedback": {} })), None);
    }

    #[test]
    fn extracts_json_from_fenced_markdown() {
        let text = "Sure!\n```json\n{\"searchQuery\": \"space comedy\"}\n```\n";
        assert_eq!(
            extract_json_object(text),
            Some("{\"searchQuery\": \"space comedy\"}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn parses_full_analysis() {
        let text = r#"{
            "genres": ["Sci-Fi", "Comedy"],
            "era": "modern",
            "mood": "funny",
            "keywords": ["space", "comedy", 42],
            "searchQuery": "space comedy"
        }"#;
        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.genres, vec!["Sci-Fi", "Comedy"]);
        assert_eq!(analysis.era.as_deref(), Some("modern"));
        assert_eq!(analysis.keywords, vec!["space", "comedy"]);
        assert_eq!(analysis.search_query, "space comedy");
    }

    #[test]
    fn classifies_parse_failures() {
        assert_eq!(parse_analysis("plain prose"), Err(AnalysisError::NoJson));
        assert_eq!(
            parse_analysis("{ not: valid json }"),
            Err(AnalysisError::InvalidJson)
        );
        assert_eq!(
            parse_analysis(r#"{"genres": ["Drama"]}"#),
            Err(AnalysisError::MissingSearchQuery)
        );
        assert_eq!(
            parse_analysis(r#"{"searchQuery": "   "}"#),
            Err(AnalysisError::MissingSearchQuery)
        );
    }
}
