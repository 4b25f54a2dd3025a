use std::collections::HashMap;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Deserialize;

use render::{DEFAULT_PLACEHOLDER, Environment, render_selected};
use templatelib::{ParseError, Resolver, Value};

#[derive(Parser)]
#[command(name = "tstring", version, about = "Template string renderer")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a template file and render it
    Render(RenderArgs),

    /// Parse a template file and report errors without rendering
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Template source file
    file: String,

    /// Treat the source as a raw literal (backslashes stay verbatim)
    #[arg(long)]
    raw: bool,

    /// Bind NAME=VALUE (repeatable); numbers and booleans are coerced
    #[arg(short, long)]
    bind: Vec<String>,

    /// TOML file with a [bindings] table
    #[arg(long)]
    bindings: Option<String>,

    /// Render only interpolations whose format spec matches this selector
    #[arg(long)]
    select: Option<String>,

    /// Placeholder for unselected interpolations (with --select)
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Dump the parsed template instead of rendering
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Template source file
    file: String,

    /// Treat the source as a raw literal
    #[arg(long)]
    raw: bool,
}

#[derive(Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: HashMap<String, toml::Value>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => do_render(args, cli.no_color),
        Command::Check(args) => do_check(args, cli.no_color),
    }
}

fn do_render(args: RenderArgs, no_color: bool) {
    let color_choice = color_choice(no_color);
    let (source, files, file_id) = read_source(&args.file);

    let env = match build_environment(&args.bind, args.bindings.as_deref()) {
        Ok(env) => env,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(1);
        }
    };

    let template = match parse(source, file_id, args.raw, &env) {
        Ok(template) => template,
        Err(error) => {
            emit_parse_error(&files, &error, color_choice);
            process::exit(1);
        }
    };

    if args.ast {
        println!("{:#?}", template);
        return;
    }

    if let Some(selector) = &args.select {
        print!("{}", render_selected(&template, selector, &args.placeholder));
        return;
    }

    match render::render(&template) {
        Ok(text) => print!("{}", text),
        Err(error) => {
            eprintln!("render error: {}", error);
            process::exit(1);
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let color_choice = color_choice(no_color);
    let (source, files, file_id) = read_source(&args.file);

    match parse(source, file_id, args.raw, &AnyName) {
        Ok(_) => eprintln!("ok: {} parsed successfully", args.file),
        Err(error) => {
            emit_parse_error(&files, &error, color_choice);
            process::exit(1);
        }
    }
}

/// Resolver used by `check`: every name resolves, so only syntax is
/// validated.
struct AnyName;

impl Resolver for AnyName {
    fn resolve(&self, _expression: &str) -> Option<Value> {
        Some(Value::Unit)
    }
}

fn parse(
    source: String,
    file_id: usize,
    raw: bool,
    resolver: &dyn Resolver,
) -> Result<templatelib::Template, ParseError> {
    let mut parser = templatelib::parser::Parser::new(source, file_id);
    if raw {
        parser = parser.raw();
    }
    parser.parse(resolver)
}

fn read_source(path: &str) -> (String, SimpleFiles<String, String>, usize) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read '{}': {}", path, error);
            process::exit(1);
        }
    };
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.to_string(), source.clone());
    (source, files, file_id)
}

fn build_environment(binds: &[String], bindings_file: Option<&str>) -> Result<Environment, String> {
    let mut env = Environment::new();

    if let Some(path) = bindings_file {
        let text = std::fs::read_to_string(path)
            .map_err(|error| format!("cannot read '{}': {}", path, error))?;
        let file: BindingsFile = toml::from_str(&text)
            .map_err(|error| format!("invalid bindings file '{}': {}", path, error))?;
        for (name, value) in file.bindings {
            env.set(name, toml_value(value));
        }
    }

    for bind in binds {
        let Some((name, raw)) = bind.split_once('=') else {
            return Err(format!("invalid binding '{}': expected NAME=VALUE", bind));
        };
        env.set(name, parse_binding(raw));
    }

    Ok(env)
}

/// Coerce a binding string: numbers become Number, "true"/"false" become
/// Boolean, everything else is a string.
fn parse_binding(s: &str) -> Value {
    if let Ok(n) = s.parse::<f64>() {
        return Value::Number(n);
    }
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(s.to_string()),
    }
}

fn toml_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(n) => Value::Number(n as f64),
        toml::Value::Float(n) => Value::Number(n),
        toml::Value::Boolean(b) => Value::Bool(b),
        other => Value::Str(other.to_string()),
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn emit_parse_error(
    files: &SimpleFiles<String, String>,
    error: &ParseError,
    color_choice: ColorChoice,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
}
