//! Batch translation
//!
//! Translates many inputs with bounded concurrency. Results keep input order
//! and a failing row records its error instead of aborting the batch.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::org::OrgNameRenderer;
use crate::routing::{route, translate_smart, Route};
use crate::translator::StatisticalTranslator;
use crate::TARGET_ROUTING;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub input: String,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn translate_batch<T>(
    inputs: Vec<String>,
    renderer: &OrgNameRenderer<'_>,
    translator: &T,
    concurrency: usize,
) -> Vec<BatchRow>
where
    T: StatisticalTranslator + ?Sized,
{
    let total = inputs.len();
    let rows: Vec<BatchRow> = stream::iter(inputs)
        .map(|input| async move {
            let route = route(&input);
            match translate_smart(&input, renderer, translator).await {
                Ok(output) => BatchRow {
                    input,
                    route,
                    output: Some(output),
                    error: None,
                },
                Err(e) => {
                    warn!(target: TARGET_ROUTING, "Failed to translate '{}': {}", input, e);
                    BatchRow {
                        input,
                        route,
                        output: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let failed = rows.iter().filter(|row| row.error.is_some()).count();
    info!(target: TARGET_ROUTING, "Batch finished: {} rows, {} failed", total, failed);
    rows
}

/// One input per line; blank lines are skipped.
pub fn read_inputs<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            inputs.push(trimmed.to_string());
        }
    }
    Ok(inputs)
}

/// Write rows as JSON lines.
pub fn write_rows<W: Write>(rows: &[BatchRow], mut writer: W) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::TranslatorError;
    use async_trait::async_trait;
    use std::io::Cursor;

    struct FailOnQuestion;

    #[async_trait]
    impl StatisticalTranslator for FailOnQuestion {
        async fn translate(&self, source: &str) -> Result<String, TranslatorError> {
            if source.ends_with('?') {
                Err(TranslatorError::EmptyResponse)
            } else {
                Ok(format!("EN: {}", source))
            }
        }
    }

    #[tokio::test]
    async fn test_translate_batch_keeps_order_and_errors() {
        let renderer = OrgNameRenderer::default();
        let inputs = vec![
            "شركة الخليج للتجارة".to_string(),
            "How are you?".to_string(),
            "Good morning".to_string(),
            "زبزب طرطر".to_string(),
        ];

        let rows = translate_batch(inputs, &renderer, &FailOnQuestion, 3).await;

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].route, Route::OrgRenderer);
        assert_eq!(rows[0].output.as_deref(), Some("Al-Khalij Trading Company"));
        assert_eq!(rows[1].route, Route::Translator);
        assert_eq!(
            rows[1].error.as_deref(),
            Some("Translator returned an empty response")
        );
        assert!(rows[1].output.is_none());
        assert_eq!(rows[2].output.as_deref(), Some("EN: Good morning"));
        assert_eq!(rows[3].output.as_deref(), Some("Zbzb Trtr Company"));
    }

    #[tokio::test]
    async fn test_translate_batch_matches_single_calls() {
        let renderer = OrgNameRenderer::default();
        let inputs = vec![
            "مكتب عال".to_string(),
            "صباح الخير".to_string(),
            "".to_string(),
        ];

        let rows = translate_batch(inputs.clone(), &renderer, &FailOnQuestion, 2).await;

        for (row, input) in rows.iter().zip(&inputs) {
            let single = translate_smart(input, &renderer, &FailOnQuestion).await.unwrap();
            assert_eq!(row.output.as_deref(), Some(single.as_str()));
        }
    }

    #[tokio::test]
    async fn test_translate_batch_empty() {
        let renderer = OrgNameRenderer::default();
        let rows = translate_batch(Vec::new(), &renderer, &FailOnQuestion, 0).await;
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_inputs_skips_blank_lines() {
        let input = "شركة النيل\n\n   \n  بنك الخليج  \n";
        let inputs = read_inputs(Cursor::new(input)).unwrap();
        assert_eq!(inputs, vec!["شركة النيل", "بنك الخليج"]);
    }

    #[test]
    fn test_write_rows_as_json_lines() {
        let rows = vec![
            BatchRow {
                input: "بنك الخليج".to_string(),
                route: Route::OrgRenderer,
                output: Some("Al-Khalij Bank".to_string()),
                error: None,
            },
            BatchRow {
                input: "Hi?".to_string(),
                route: Route::Translator,
                output: None,
                error: Some("timeout".to_string()),
            },
        ];
        let mut buffer = Vec::new();
        write_rows(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["route"], "org_renderer");
        assert_eq!(first["output"], "Al-Khalij Bank");
        assert!(first.get("error").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], "timeout");
    }
}
