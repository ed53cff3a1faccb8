//! Minimal CLI: graph document → Java expression
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use crate::document::GraphDocument;
use crate::inliner::Inliner;
use crate::types::TypeName;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// turn JSON object-graph documents into single Java expressions that rebuild them
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// inline each document's root value and print the expression
    Inline(InlineOut),
    /// inline each document and only report whether it succeeded
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more graph documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InlinerSettings {
    /// trust these classes exactly (fully qualified), on top of the document's own rules
    #[arg(long, num_args = 1..)]
    trust_exact: Vec<String>,

    /// trust everything assignable to these types (fully qualified)
    #[arg(long, num_args = 1..)]
    trust_assignable: Vec<String>,

    /// prefix for generated local variable names
    #[arg(long)]
    name_prefix: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct InlineOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inliner_settings: InlinerSettings,

    /// output .java fragment file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inliner_settings: InlinerSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(&Path, GraphDocument)) -> anyhow::Result<()> {
        let source_paths =
            resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        for source_path in source_paths {
            let source = std::fs::read(&source_path)
                .with_context(|| format!("failed to read source file {}", source_path.display()))?;
            let document = GraphDocument::parse_bytes(&source)
                .with_context(|| format!("failed to parse graph document {}", source_path.display()))?;
            apply(&source_path, document);
        }
        Ok(())
    }
}

impl InlinerSettings {
    fn inliner(&self) -> anyhow::Result<Inliner> {
        let mut inliner = Inliner::new()
            .trust_exact_types(parse_types(&self.trust_exact)?)
            .trust_types_assignable_to(parse_types(&self.trust_assignable)?);
        if let Some(prefix) = self.name_prefix.as_ref() {
            inliner = inliner.use_name_prefix(prefix.as_str());
        }
        Ok(inliner)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Inline(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let inliner = target.inliner_settings.inliner()?;
                let mut outputs = Vec::<(PathBuf, anyhow::Result<String>)>::new();
                target.input_settings.load_process(|path, document| {
                    outputs.push((path.to_path_buf(), inline_document(&inliner, document)));
                })?;

                let single = outputs.len() == 1;
                let mut java_src = String::new();
                for (path, output) in outputs {
                    let expr = output.with_context(|| format!("failed to inline {}", path.display()))?;
                    if !single {
                        java_src.push_str(&format!("// {}\n", path.display()));
                    }
                    java_src.push_str(&expr);
                    java_src.push('\n');
                }

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &java_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    info!(path = %out.display(), "expression written");
                } else {
                    print!("{java_src}");
                }
                Ok(())
            }
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let inliner = target.inliner_settings.inliner()?;
                let mut failures = 0usize;
                target.input_settings.load_process(|path, document| {
                    match inline_document(&inliner, document) {
                        Ok(_) => eprintln!("{} {}", "ok".green(), path.display()),
                        Err(error) => {
                            failures += 1;
                            eprintln!("{} {}: {error:#}", "failed".red(), path.display());
                        }
                    }
                })?;
                if failures > 0 {
                    bail!("{failures} document(s) could not be inlined");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn inline_document(inliner: &Inliner, document: GraphDocument) -> anyhow::Result<String> {
    let graph = document.load()?;
    let inliner = graph.configure(inliner.clone());
    Ok(inliner.inlined(&graph.root)?.to_string())
}

fn parse_types(names: &[String]) -> anyhow::Result<Vec<TypeName>> {
    names
        .iter()
        .map(|name| TypeName::parse(name).with_context(|| format!("`{name}` is not a valid type name")))
        .collect()
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // an explicit glob that matched nothing is an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through_and_empty_globs_fail() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }

    #[test]
    fn arguments_parse_into_an_inliner() {
        let cli = CommandLineInterface::try_parse_from([
            "object-inliner",
            "inline",
            "-i",
            "graph.json",
            "--trust-exact",
            "com.example.Person",
            "--trust-assignable",
            "java.util.List",
            "java.util.Map",
            "--name-prefix",
            "tmp_",
        ])
        .unwrap();
        let Command::Inline(target) = &cli.cmd else {
            panic!("expected the inline subcommand");
        };
        assert_eq!(target.input_settings.input, vec!["graph.json".to_string()]);
        let inliner = target.inliner_settings.inliner().unwrap();
        assert_eq!(inliner.config().trust().rules().len(), 3);
        assert_eq!(inliner.config().name_prefix(), "tmp_");
    }

    #[test]
    fn documents_inline_through_the_cli_helper() {
        let document = GraphDocument::parse(
            r#"{"objects": {"l": {"list": [1]}}, "trust": {"assignable": ["java.util.List"]}, "root": {"ref": "l"}}"#,
        )
        .unwrap();
        let expr = inline_document(&Inliner::new(), document).unwrap();
        assert!(expr.contains("$$inline$ArrayList.add(1);"));

        let bad = InlinerSettings {
            trust_exact: vec!["not a type".to_string()],
            trust_assignable: Vec::new(),
            name_prefix: None,
        };
        assert!(bad.inliner().is_err());
    }
}
