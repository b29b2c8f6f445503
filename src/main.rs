use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use wren::config::Workspace;
use wren::definitions::InterpolatingMap;
use wren::events::Notifier;
use wren::processors::{ProcessorChain, ProcessorContext};
use wren::sigils::{PREFIX, SigilKeyOperator};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: wren <definitions.json> <document>");
        return ExitCode::FAILURE;
    }

    match run(&args[1], &args[2]) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("wren: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(definitions_path: &str, document_path: &str) -> Result<String, String> {
    let workspace = match env::var_os("WREN_CONFIG") {
        Some(path) => Workspace::load(Path::new(&path)).map_err(|e| e.to_string())?,
        None => Workspace::load_default(),
    };

    let definitions = load_definitions(definitions_path, &workspace)?;
    let notifier = Notifier::sink(|event| eprintln!("wren: {event}"));

    // Resolution failures degrade to visible tokens, never a dead run.
    match definitions.interpolate() {
        Ok(0) => {}
        Ok(failures) => notifier.notify(format!("{failures} unresolved variable reference(s)")),
        Err(error) => notifier.notify(error.to_string()),
    }

    let document = fs::read_to_string(document_path)
        .map_err(|e| format!("cannot read {document_path}: {e}"))?;

    let scripted = document.contains(PREFIX) || !workspace.bootstrap_script.is_empty();
    let context = ProcessorContext::new(Arc::new(definitions), workspace, notifier);

    let chain = if scripted {
        ProcessorChain::scripting(&context)
    } else {
        ProcessorChain::variables(&context)
    };

    Ok(chain.process(&document))
}

fn load_definitions(path: &str, workspace: &Workspace) -> Result<InterpolatingMap, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let root: Value =
        serde_json::from_str(&content).map_err(|e| format!("cannot parse {path}: {e}"))?;

    let map = InterpolatingMap::new(SigilKeyOperator::new(workspace.sigils.clone()));
    flatten(&root, String::new(), &map);

    Ok(map)
}

/// Flatten nested objects into dot-segmented keys; leaves become
/// definition values.
fn flatten(value: &Value, prefix: String, map: &InterpolatingMap) {
    match value {
        Value::Object(fields) => {
            for (name, child) in fields {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                flatten(child, key, map);
            }
        }
        Value::String(leaf) => {
            map.insert(prefix, leaf.clone());
        }
        leaf => {
            map.insert(prefix, leaf.to_string());
        }
    }
}
