//! CLI for `apitest-gen`.
//!
//! # Subcommands
//!
//! ```text
//! # All test cases for a document (JSON array on stdout)
//! apitest-gen generate --input openapi.yaml --pretty
//!
//! # Only one path, skipping a rule, written to a file
//! apitest-gen generate --input openapi.yaml --path '/pets/{id}' \
//!   --no-unauthorized --output pets.json
//!
//! # One test case for the change between two revisions ({} if none)
//! apitest-gen diff --old v1.yaml --new v2.yaml
//!
//! # What the generator sees in a document
//! apitest-gen inspect --input openapi.yaml
//! ```

#![forbid(unsafe_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use apitest_gen::{ApiSpec, GenerateConfig, Generator, ProjectConfig, SpecDiff};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Rule-based REST API test case generator for Swagger 2 / `OpenAPI` 3 documents.
#[derive(Parser)]
#[command(name = "apitest-gen", version, about)]
struct Cli {
    /// Log rule decisions at debug level (overrides `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate test cases for a whole document or a single path.
    Generate(GenerateArgs),

    /// Generate one test case for the change between two document revisions.
    Diff(DiffArgs),

    /// Print the operations and schemas the generator reads from a document.
    Inspect(InspectArgs),
}

#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
struct GenerateArgs {
    /// Path to the Swagger/`OpenAPI` document (YAML or JSON).
    #[arg(short, long)]
    input: PathBuf,

    /// Only generate for this path template (e.g., `/pets/{id}`).
    #[arg(short, long)]
    path: Option<String>,

    /// Path to a project config YAML file.
    ///
    /// Provides rule toggles and output formatting.
    /// CLI flags override values from the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Skip the Simple-Success-GET rule.
    #[arg(long)]
    no_simple_get: bool,

    /// Skip the Missing-Body-Property rule.
    #[arg(long)]
    no_missing_body_property: bool,

    /// Skip the Resource-Not-Found rule.
    #[arg(long)]
    no_resource_not_found: bool,

    /// Skip the Unauthorized-Access rule.
    #[arg(long)]
    no_unauthorized: bool,

    /// Skip the Valid-Creation-POST rule.
    #[arg(long)]
    no_valid_creation_post: bool,
}

#[derive(Parser)]
struct DiffArgs {
    /// Previous revision of the document.
    #[arg(long)]
    old: PathBuf,

    /// Updated revision of the document.
    #[arg(long)]
    new: PathBuf,

    /// Path to a project config YAML file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser)]
struct InspectArgs {
    /// Path to the Swagger/`OpenAPI` document (YAML or JSON).
    #[arg(short, long)]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Diff(args) => run_diff(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let project = load_project_config(args.config.as_deref())?;
    let spec = read_spec(&args.input)?;

    let config = GenerateConfig::new().with_project_config(&project);
    let generator = Generator::new(&apply_cli_overrides(config, args));

    let generated = match &args.path {
        Some(path) => generator
            .generate_for_path(&spec, path)
            .with_context(|| format!("Failed to generate for {path}"))?,
        None => generator.generate_for_specification(&spec),
    };
    eprintln!(
        "Generated {} test cases with rules: {}",
        generated.len(),
        generator.rule_names().join(", ")
    );

    let json = apitest_gen::to_json(&generated, args.pretty || project.pretty)
        .context("Failed to serialize test cases")?;
    write_output(args.output.as_deref(), &json)
}

/// Apply CLI flags that override config file values.
fn apply_cli_overrides(mut config: GenerateConfig, args: &GenerateArgs) -> GenerateConfig {
    // Disable flags (one-directional: can only turn off via CLI)
    if args.no_simple_get {
        config = config.skip_simple_get();
    }
    if args.no_missing_body_property {
        config = config.skip_missing_body_property();
    }
    if args.no_resource_not_found {
        config = config.skip_resource_not_found();
    }
    if args.no_unauthorized {
        config = config.skip_unauthorized();
    }
    if args.no_valid_creation_post {
        config = config.skip_valid_creation_post();
    }
    config
}

fn run_diff(args: &DiffArgs) -> anyhow::Result<()> {
    let project = load_project_config(args.config.as_deref())?;
    let old = read_spec(&args.old)?;
    let new = read_spec(&args.new)?;

    let diff = SpecDiff::between(&old, &new);
    eprintln!(
        "{} new, {} missing, {} changed operations; {} changed schemas",
        diff.new_endpoints().len(),
        diff.missing_endpoints().len(),
        diff.changed_operations().len(),
        diff.changed_schemas().len(),
    );

    let generator = Generator::new(&GenerateConfig::new().with_project_config(&project));
    let selected = generator.select_test_for_change(&diff, &new);
    match &selected {
        Some((test_case, _)) => eprintln!("Selected: {}", test_case.name),
        None => eprintln!("No test case applies to the change"),
    }

    let json = apitest_gen::selection_to_json(selected.as_ref(), args.pretty || project.pretty)
        .context("Failed to serialize test case")?;
    write_output(args.output.as_deref(), &json)
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.input)?;
    print!("{}", describe(&spec));
    Ok(())
}

/// Human-readable summary of what the generator reads from a document.
fn describe(spec: &ApiSpec) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} document ===", spec.version());
    let _ = writeln!(out);

    let _ = writeln!(out, "Operations: {}", spec.operations().count());
    for op in spec.operations() {
        let statuses: Vec<&str> = op.status_codes.iter().map(String::as_str).collect();
        let _ = write!(
            out,
            "  {} {} (params: {}, statuses: [{}]",
            op.method,
            op.path,
            op.parameters.len(),
            statuses.join(", ")
        );
        if let Some(body) = &op.request_body {
            let required = if body.required { "required" } else { "optional" };
            let schema = body.schema_ref.as_deref().unwrap_or("inline");
            let _ = write!(out, ", body: {schema} ({required})");
        }
        let _ = writeln!(out, ")");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Schemas: {}", spec.schemas().len());
    for schema in spec.schemas().iter() {
        let props: Vec<String> = schema
            .properties
            .iter()
            .map(|(name, kind)| format!("{name}: {kind}"))
            .collect();
        let _ = writeln!(out, "  {} {{ {} }}", schema.name, props.join(", "));
    }

    out
}

fn load_project_config(path: Option<&Path>) -> anyhow::Result<ProjectConfig> {
    match path {
        Some(path) => {
            eprintln!("Loading config: {}", path.display());
            ProjectConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => Ok(ProjectConfig::default()),
    }
}

fn read_spec(path: &Path) -> anyhow::Result<ApiSpec> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ApiSpec::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_output(path: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write content to a temporary file and return its path.
    fn write_temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("apitest_gen_test_{name}"));
        fs::write(&path, content).unwrap();
        path
    }

    fn generate_args(extra: &[&str]) -> GenerateArgs {
        let mut argv = vec!["apitest-gen", "generate", "--input", "api.yaml"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Generate(args) => args,
            _ => panic!("expected generate subcommand"),
        }
    }

    #[test]
    fn no_flags_keep_config_rules() {
        let project: ProjectConfig =
            serde_yaml_ng::from_str("rules:\n  resource_not_found: false\n").unwrap();
        let config = apply_cli_overrides(
            GenerateConfig::new().with_project_config(&project),
            &generate_args(&[]),
        );
        let names = Generator::new(&config).rule_names();
        assert_eq!(names.len(), 4);
        assert!(!names.contains(&"resource-not-found"));
    }

    #[test]
    fn skip_flags_disable_rules() {
        let args = generate_args(&["--no-simple-get", "--no-unauthorized"]);
        let names = Generator::new(&apply_cli_overrides(GenerateConfig::new(), &args)).rule_names();
        assert_eq!(
            names,
            vec!["missing-body-property", "resource-not-found", "valid-creation-post"]
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["apitest-gen", "inspect", "--input", "a.yaml", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn diff_requires_both_revisions() {
        assert!(Cli::try_parse_from(["apitest-gen", "diff", "--old", "a.yaml"]).is_err());
    }

    #[test]
    fn describe_lists_operations_and_schemas() {
        let spec = ApiSpec::parse(
            r"
swagger: '2.0'
paths:
  /pets:
    post:
      parameters:
        - { name: body, in: body, required: true, schema: { $ref: '#/definitions/Pet' } }
      responses:
        '201': { description: created }
definitions:
  Pet:
    properties:
      name: { type: string }
",
        )
        .unwrap();

        let text = describe(&spec);
        assert!(text.contains("=== Swagger 2 document ==="));
        assert!(text.contains("POST /pets (params: 1, statuses: [201], body: #/definitions/Pet (required))"));
        assert!(text.contains("Pet { name: string }"));
    }

    #[test]
    fn read_spec_reports_path_on_parse_failure() {
        let path = write_temp_file("bad_spec.yaml", "info: {}\n");
        let err = read_spec(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn read_spec_missing_file_errors() {
        let err = read_spec(Path::new("/nonexistent/api.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
