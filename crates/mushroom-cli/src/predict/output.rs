use mushroom_classifier::{Class, PredictionResult};

const BAR_WIDTH: usize = 40;

/// Two-bar text chart of the class probabilities.
pub fn render_probability_bars(result: &PredictionResult) -> String {
    let mut out = String::new();
    for class in Class::ALL {
        let p = result.probability(class);
        let filled = ((p * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        out.push_str(&format!(
            "{:<10}|{}{}| {:.3}\n",
            class.as_str(),
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            p
        ));
    }
    out
}

pub fn render_text(result: &PredictionResult) -> String {
    let mut out = format!("{}\n\n", result);
    out.push_str(&render_probability_bars(result));
    if !result.unresolved.is_empty() {
        out.push_str(&format!(
            "\nNo training data for: {}\n",
            result.unresolved.join(", ")
        ));
    }
    out
}

pub fn render_json(result: &PredictionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
