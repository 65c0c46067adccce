//! One-shot generation: build the input from flags, run one request, render the outcome.

use std::path::PathBuf;

use rulegen::presentation::{error_block, logic_expression_text};
use rulegen::{DisplayMode, InputModel, LifecycleState, RequestOrchestrator, RuleService};

use crate::error::CliError;
use crate::example_index;
use crate::render::render_view;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Explicit prompt; wins over `example`.
    pub prompt: Option<String>,
    /// 1-based example number.
    pub example: Option<usize>,
    /// Context snippets given on the command line.
    pub context: Vec<String>,
    /// File whose lines are appended after `context`.
    pub context_file: Option<PathBuf>,
    pub raw: bool,
    /// Print the response body as JSON instead of the formatted view.
    pub json: bool,
    pub pretty: bool,
}

impl GenerateOptions {
    /// Prompt: `prompt`, else `example`, else the first example. Context: the given snippets and
    /// file, or the default context when neither is given.
    pub fn build_input(&self) -> Result<InputModel, CliError> {
        let mut input = InputModel::default();
        if let Some(number) = self.example {
            input.apply_example(example_index(number)?);
        }
        if let Some(prompt) = &self.prompt {
            input.set_prompt(prompt.as_str());
        }

        if !self.context.is_empty() || self.context_file.is_some() {
            let mut lines = self.context.clone();
            if let Some(path) = &self.context_file {
                let text = std::fs::read_to_string(path).map_err(|source| CliError::ContextFile {
                    path: path.clone(),
                    source,
                })?;
                lines.push(text);
            }
            input.set_context(lines.join("\n"));
        }
        Ok(input)
    }

    fn display_mode(&self) -> DisplayMode {
        if self.raw {
            DisplayMode::Raw
        } else {
            DisplayMode::Summary
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOutput {
    /// Text for stdout (or stderr when `failed`).
    pub text: String,
    pub failed: bool,
    /// Final lifecycle state of the request.
    pub state: LifecycleState,
}

/// Runs exactly one request and renders it according to `opts`.
pub async fn run_generate(
    service: &dyn RuleService,
    input: &InputModel,
    opts: &GenerateOptions,
) -> Result<GenerateOutput, CliError> {
    let mut orchestrator = RequestOrchestrator::new();
    orchestrator.run(input, service).await;
    let state = orchestrator.state().clone();

    if let LifecycleState::Failed(message) = &state {
        return Ok(GenerateOutput {
            text: error_block(message),
            failed: true,
            state,
        });
    }

    let logic = logic_expression_text(&state);
    let text = match state.result() {
        Some(result) if opts.json => {
            if opts.pretty {
                serde_json::to_string_pretty(result.raw())?
            } else {
                serde_json::to_string(result.raw())?
            }
        }
        _ => {
            let mut text = render_view(&rulegen::project(&state, opts.display_mode()));
            if let (DisplayMode::Summary, Some(logic)) = (opts.display_mode(), &logic) {
                text.push_str("\nJSON Logic\n");
                for line in logic.lines() {
                    text.push_str("  ");
                    text.push_str(line);
                    text.push('\n');
                }
            }
            text.trim_end().to_string()
        }
    };
    Ok(GenerateOutput {
        text,
        failed: false,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rulegen::{GenerateError, GenerationResult, RuleRequest, DEFAULT_CONTEXT, EXAMPLES};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct StubService {
        body: Result<Value, GenerateError>,
        seen: Mutex<Vec<RuleRequest>>,
    }

    impl StubService {
        fn new(body: Result<Value, GenerateError>) -> Self {
            Self {
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RuleService for StubService {
        async fn generate(&self, request: &RuleRequest) -> Result<GenerationResult, GenerateError> {
            self.seen.lock().unwrap().push(request.clone());
            self.body.clone().map(GenerationResult::from_value)
        }
    }

    #[test]
    fn default_input_is_first_example_with_default_context() {
        let input = GenerateOptions::default().build_input().unwrap();
        assert_eq!(input.prompt(), EXAMPLES[0]);
        assert_eq!(input.context(), DEFAULT_CONTEXT);
    }

    #[test]
    fn prompt_beats_example_and_context_replaces_default() {
        let opts = GenerateOptions {
            prompt: Some("custom".into()),
            example: Some(2),
            context: vec!["one".into(), "two".into()],
            ..Default::default()
        };
        let input = opts.build_input().unwrap();
        assert_eq!(input.prompt(), "custom");
        assert_eq!(input.to_request_payload().context_docs, vec!["one", "two"]);
    }

    #[test]
    fn context_file_lines_follow_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.txt");
        std::fs::write(&path, "from file\n\n  second  \n").unwrap();
        let opts = GenerateOptions {
            context: vec!["flag".into()],
            context_file: Some(path),
            ..Default::default()
        };
        let docs = opts.build_input().unwrap().to_request_payload().context_docs;
        assert_eq!(docs, vec!["flag", "from file", "second"]);
    }

    #[test]
    fn missing_context_file_and_bad_example_are_errors() {
        let opts = GenerateOptions {
            context_file: Some(PathBuf::from("/nonexistent/rulegen/ctx.txt")),
            ..Default::default()
        };
        assert!(matches!(opts.build_input(), Err(CliError::ContextFile { .. })));

        let opts = GenerateOptions {
            example: Some(7),
            ..Default::default()
        };
        assert!(matches!(
            opts.build_input(),
            Err(CliError::ExampleOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn summary_output_includes_logic() {
        let svc = StubService::new(Ok(json!({
            "explanation": "Approves strong files.",
            "json_logic": { ">": [{ "var": "bureau.score" }, 700] }
        })));
        let input = InputModel::default();
        let out = run_generate(&svc, &input, &GenerateOptions::default())
            .await
            .unwrap();
        assert!(!out.failed);
        assert!(out.text.contains("Approves strong files."));
        assert!(out.text.contains("JSON Logic\n  {"));
        assert!(logic_expression_text(&out.state).is_some());
        assert_eq!(svc.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn json_output_is_compact_unless_pretty() {
        let body = json!({ "used_keys": ["a"], "json_logic": null });
        let svc = StubService::new(Ok(body.clone()));
        let input = InputModel::default();

        let compact = GenerateOptions {
            json: true,
            ..Default::default()
        };
        let out = run_generate(&svc, &input, &compact).await.unwrap();
        assert!(!out.text.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&out.text).unwrap(), body);
        assert!(logic_expression_text(&out.state).is_none());

        let pretty = GenerateOptions {
            json: true,
            pretty: true,
            ..Default::default()
        };
        let out = run_generate(&svc, &input, &pretty).await.unwrap();
        assert!(out.text.contains('\n'));
    }

    #[tokio::test]
    async fn failure_renders_error_block() {
        let svc = StubService::new(Err(GenerateError::Server {
            status: 500,
            message: "Request failed: 500".into(),
        }));
        let out = run_generate(&svc, &InputModel::default(), &GenerateOptions::default())
            .await
            .unwrap();
        assert!(out.failed);
        assert_eq!(
            serde_json::from_str::<Value>(&out.text).unwrap(),
            json!({ "message": "Request failed: 500" })
        );
    }

    #[tokio::test]
    async fn raw_mode_prints_body() {
        let svc = StubService::new(Ok(json!({})));
        let opts = GenerateOptions {
            raw: true,
            ..Default::default()
        };
        let out = run_generate(&svc, &InputModel::default(), &opts).await.unwrap();
        assert_eq!(out.text, "{}");
    }
}
