use crate::error::{PipelineError, Result};
use crate::types::{DatasetRecord, ImageSample, InferenceRequest};
use base64::{engine::general_purpose, Engine as _};

pub const ANIMAL_PROMPT: &str = r#"Identify the type of animal in the image. Respond **only** with a valid JSON object, following the exact structure below. Do not include explanations, text, or code block delimiters. The response must be **only JSON**.

{
    "common_name": "Common name of the animal",
    "scientific_name": "Scientific name if known",
    "taxonomy": {
        "class": "Mammal/Bird/Reptile/Amphibian/Fish",
        "order": "Taxonomic order",
        "family": "Taxonomic family"
    },
    "habitat": {
        "type": "Habitat types",
        "geographic_region": "Regions where it lives",
        "climate": "Climate types"
    },
    "diet": {
        "type": "Carnivore/Herbivore/Omnivore",
        "main_foods": "List of foods"
    },
    "physical_traits": {
        "size": {
            "average_height_cm": "Average height in cm",
            "average_weight_kg": "Average weight in kg"
        },
        "predominant_colors": "Colors",
        "distinctive_features": "Special characteristics"
    },
    "conservation_status": {
        "iucn_classification": "Conservation status according to the IUCN",
        "main_threats": "Main threats"
    }
}

**Ensure that the response is valid JSON and contains no additional text, markdown, or formatting.**"#;

pub fn sentiment_prompt(text: &str) -> String {
    format!("Analyze the sentiment of this text and respond with only one word (positive/negative/neutral): \"{text}\"")
}

pub fn sentiment_request(model: &str, text: &str) -> InferenceRequest {
    InferenceRequest { model: model.to_string(), prompt: sentiment_prompt(text), images: None, stream: false }
}

pub fn animal_request(model: &str, sample: &ImageSample) -> Result<InferenceRequest> {
    if sample.image_bytes.is_empty() {
        return Err(PipelineError::Encoding(format!("{} has no image data", sample.file_name)));
    }
    Ok(InferenceRequest {
        model: model.to_string(),
        prompt: ANIMAL_PROMPT.to_string(),
        images: Some(vec![general_purpose::STANDARD.encode(&sample.image_bytes)]),
        stream: false,
    })
}

/// Builds the request for any record kind; the record decides the template.
pub fn build_request(record: &DatasetRecord, model: &str) -> Result<InferenceRequest> {
    match record {
        DatasetRecord::GameReview(pair) => Ok(sentiment_request(model, &pair.review_text)),
        DatasetRecord::Image(sample) => animal_request(model, sample),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameReviewPair;

    #[test]
    fn sentiment_prompt_quotes_review() {
        let rec = DatasetRecord::GameReview(GameReviewPair {
            game_id: "10".into(),
            game_name: "Counter-Strike".into(),
            review_text: "Still the best.".into(),
        });
        let req = build_request(&rec, "llama3.2").unwrap();
        assert_eq!(req.model, "llama3.2");
        assert!(req.prompt.ends_with("(positive/negative/neutral): \"Still the best.\""));
        assert!(req.images.is_none());
        assert!(!req.stream);

        let wire = serde_json::to_value(&req).unwrap();
        assert!(wire.get("images").is_none());
        assert_eq!(wire["stream"], false);
    }

    #[test]
    fn animal_request_embeds_base64_image() {
        let sample = ImageSample { category: "cats".into(), file_name: "a.png".into(), image_bytes: b"hello".to_vec() };
        let req = build_request(&DatasetRecord::Image(sample), "llava").unwrap();
        assert_eq!(req.images, Some(vec!["aGVsbG8=".to_string()]));
        assert!(req.prompt.contains("\"conservation_status\""));
    }

    #[test]
    fn empty_image_is_an_encoding_error() {
        let sample = ImageSample { category: "cats".into(), file_name: "empty.png".into(), image_bytes: vec![] };
        assert!(matches!(animal_request("llava", &sample), Err(PipelineError::Encoding(_))));
    }
}
