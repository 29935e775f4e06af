// Terminal rendering of pipeline outcomes

use crate::pipeline::{PipelineOutcome, PipelineReport};
use crossterm::style::Color;
use termimad::MadSkin;

/// Markdown report for a completed run, one section per stage result
pub fn report_markdown(report: &PipelineReport) -> String {
    format!(
        "# Voice Translation\n\n\
         **Detected speech:** {}\n\n\
         **Detected language:** `{}`\n\n\
         **Translated text:** {}\n\n\
         **Sentiment:** {} {} (score: {})\n\n\
         ## Underlying meaning\n\n\
         {}\n",
        report.text,
        report.source_language,
        report.translated_text,
        report.mood.emoji(),
        report.mood.as_str(),
        report.score_formatted(),
        report.meaning,
    )
}

/// Render an outcome to the terminal
pub fn render(outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Completed(report) => {
            skin().print_text(&report_markdown(report));
        }
        PipelineOutcome::TranscriptionFailed => {
            eprintln!("❌ Could not understand audio.");
        }
    }
}

fn skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Yellow);
    skin.bold.set_fg(Color::Cyan);
    skin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MoodLabel;

    fn report() -> PipelineReport {
        PipelineReport {
            text: "I am so happy today".to_string(),
            source_language: "en".to_string(),
            translated_text: "Estoy muy feliz hoy".to_string(),
            mood: MoodLabel::Positive,
            sentiment_score: 0.62,
            meaning: "The speaker is delighted.".to_string(),
            audio: vec![0xff, 0xf3],
        }
    }

    #[test]
    fn test_markdown_carries_every_stage_result() {
        let markdown = report_markdown(&report());
        assert!(markdown.contains("I am so happy today"));
        assert!(markdown.contains("`en`"));
        assert!(markdown.contains("Estoy muy feliz hoy"));
        assert!(markdown.contains("Positive"));
        assert!(markdown.contains("The speaker is delighted."));
    }

    #[test]
    fn test_markdown_score_has_two_decimals() {
        let markdown = report_markdown(&report());
        assert!(markdown.contains("(score: 0.62)"));
    }
}
