use std::fs::{self, read_to_string};
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser as ClapParser};
use thiserror::Error;

use codegen::gen_assm;
use emission::output;
use lexer::{Lexer, TokenType};
use mir::{debug_tacky, gen_tacky};
use parser::Parser;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = "Runs the dcc C compiler")]
struct Arguments {
    /// Path to C source file
    path: String,

    /// Specifies a point in the compilation process for dcc to stop, only
    /// one(1) option can be specified at a time
    #[command(flatten)]
    stage_options: StageOptions,

    /// Write out the intermediate tacky code
    #[arg(short = 'd')]
    debug: bool,
}

/// Run C compiler with optional arguments
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct StageOptions {
    /// Stop after lexer
    #[arg(long)]
    lex: bool,

    /// Stop after parser
    #[arg(long)]
    parse: bool,

    /// Stop after assembly generation
    #[arg(long)]
    codegen: bool,

    /// Emit assembly file, but do not assemble or link it
    #[arg(short = 'S')]
    s: bool,
}

/// Which stage the compiler should stop at
pub enum StopStage {
    Lexer,
    Parser,
    CodeGen,
    Assembler,
}

impl StopStage {
    fn from_args(options: &StageOptions) -> Option<StopStage> {
        if options.lex {
            Some(StopStage::Lexer)
        } else if options.parse {
            Some(StopStage::Parser)
        } else if options.codegen {
            Some(StopStage::CodeGen)
        } else if options.s {
            Some(StopStage::Assembler)
        } else {
            None
        }
    }
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("'{0}' is not a .c source file")]
    NotCSource(String),
    #[error("source file '{0}' could not be found")]
    SourceNotFound(String),
    #[error("{tool} exited with status code {code}")]
    ToolFailed { tool: &'static str, code: i32 },
    #[error("Lexer encountered an error(s): {:#?}", .0)]
    Lexer(Vec<String>),
}

pub fn main() -> Result<()> {
    // argument errors must exit 1 like every other failure, so route them
    // through the Result chain; --help and --version are not errors
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let stop_stage = StopStage::from_args(&args.stage_options);

    run_driver(&args.path, &stop_stage, args.debug)
}

pub fn run_driver(path: &str, stop_stage: &Option<StopStage>, debug: bool) -> Result<()> {
    let src_path = Path::new(path);

    match src_path.extension() {
        Some(ext) if ext == "c" => {}
        _ => bail!(DriverError::NotCSource(path.to_string())),
    }

    if !src_path.exists() {
        bail!(DriverError::SourceNotFound(path.to_string()));
    }

    let pp_path = src_path.with_extension("i");
    let assembly_path = src_path.with_extension("s");

    // Preprocess input
    let status = Command::new("gcc")
        .arg("-E")
        .arg("-P")
        .arg(src_path)
        .arg("-o")
        .arg(&pp_path)
        .status()
        .context("Failed to execute preprocessor process")?;

    if !status.success() {
        bail!(DriverError::ToolFailed {
            tool: "preprocessor",
            code: status.code().unwrap_or(-1),
        });
    }

    // compile
    let compile_result = compile(&pp_path, stop_stage, &assembly_path, debug);

    // the preprocessed file is scratch space, delete it whether or not
    // compilation succeeded
    let cleanup_result = fs::remove_file(&pp_path);

    compile_result?;
    cleanup_result.with_context(|| {
        format!("Failed to delete preprocessed file {}", pp_path.display())
    })?;

    // Assemble and link only if we don't stop during compilation
    if stop_stage.is_none() {
        let bin_path = src_path.with_extension("");

        let status = Command::new("gcc")
            .arg(&assembly_path)
            .arg("-o")
            .arg(&bin_path)
            .status()
            .context("Failed to execute assembler and linker")?;

        if !status.success() {
            bail!(DriverError::ToolFailed {
                tool: "assembler and linker",
                code: status.code().unwrap_or(-1),
            });
        }
    }

    Ok(())
}

/// Actually run our compiler stages: Lexer, Parser, TACKY, Codegen
/// If no StopStage is specified, an assembly file is outputted with a ".s"
/// extension; only Lexer, Parser, and CodeGen StopStages are used here
pub fn compile(
    path: &Path,
    stop_stage: &Option<StopStage>,
    assm_path: &Path,
    debug: bool,
) -> Result<()> {
    let source = read_to_string(path)
        .with_context(|| format!("Unable to read source file: {}", path.display()))?;

    let mut lexer = Lexer::new(&source);

    let (tokens, errors): (Vec<_>, Vec<_>) = lexer.tokenize().partition(|t| {
        t.kind != TokenType::Unknown
            && t.kind != TokenType::InvalidIdent
            && t.kind != TokenType::Error
    });

    if !errors.is_empty() {
        let mut error_msgs = Vec::new();

        for err in errors {
            error_msgs.push(format!(
                "{:?} at {}:{}:{}: '{}'",
                err.value,
                path.display(),
                err.line,
                err.col,
                &source[err.start..err.end]
            ));
        }

        bail!(DriverError::Lexer(error_msgs));
    }

    if let Some(StopStage::Lexer) = stop_stage {
        return Ok(());
    }

    let mut parser = Parser::new(tokens);
    let ast = parser.parse()?;

    if let Some(StopStage::Parser) = stop_stage {
        return Ok(());
    }

    let tacky = gen_tacky(ast);

    if debug {
        let tacky_path = assm_path.with_extension("tacky");
        debug_tacky(&tacky, &tacky_path)?;
    }

    let assm_ast = gen_assm(&tacky);

    if let Some(StopStage::CodeGen) = stop_stage {
        return Ok(());
    }

    output(assm_path, &assm_ast)?;

    Ok(())
}
