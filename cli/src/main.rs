mod listing;
mod render;

use clap::{Arg, ArgMatches, Command};
use console::style;
use log::LevelFilter;
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tinyvm_core::reports::{E_IO, Report, ReportCollector};
use tinyvm_core::vm::check::check;
use tinyvm_core::{Program, Script, Snapshot, VM, VmConfig, VmError, samples};

/// Load, parse or check failures.
const EXIT_LOAD: u8 = 1;
/// Errors raised while the program was running.
const EXIT_EXEC: u8 = 2;

fn main() -> ExitCode {
    let cli = Command::new("tinyvm")
        .version("0.1.0")
        .about("Assemble, inspect and run programs for a four-register toy machine");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .and_then(|l| LevelFilter::from_str(l).ok())
        .unwrap_or(LevelFilter::Warn);
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialise logging: {}", e);
    }

    dispatch_commands(&matches)
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    let file_arg = || {
        Arg::new("file")
            .help("The program file to load")
            .required(true)
            .index(1)
    };
    let input_arg = || {
        Arg::new("input")
            .help("Text fed to READ")
            .short('i')
            .long("input")
            .value_parser(clap::value_parser!(String))
            .value_name("TEXT")
    };
    let input_file_arg = || {
        Arg::new("input-file")
            .help("Read the input text from a file")
            .long("input-file")
            .conflicts_with("input")
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("PATH")
    };

    cli.arg(
        Arg::new("log-level")
            .help("Log level: off, error, warn, info, debug or trace")
            .long("log-level")
            .global(true)
            .env("TINYVM_LOG")
            .value_parser(["off", "error", "warn", "info", "debug", "trace"])
            .value_name("LEVEL"),
    )
    .arg(
        Arg::new("config")
            .help("JSON machine configuration")
            .short('c')
            .long("config")
            .global(true)
            .env("TINYVM_CONFIG")
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("FILE"),
    )
    .subcommand(
        Command::new("run")
            .about("Run a program to completion and print its output")
            .arg(file_arg())
            .arg(input_arg())
            .arg(input_file_arg())
            .arg(
                Arg::new("dump")
                    .help("Print the final machine state")
                    .short('d')
                    .long("dump")
                    .value_parser(["state", "json"])
                    .value_name("FORMAT"),
            ),
    )
    .subcommand(
        Command::new("step")
            .about("Execute a program one instruction at a time and print a trace")
            .arg(file_arg())
            .arg(input_arg())
            .arg(input_file_arg())
            .arg(
                Arg::new("count")
                    .help("Maximum number of steps")
                    .short('n')
                    .long("count")
                    .default_value("20")
                    .value_parser(clap::value_parser!(usize))
                    .value_name("N"),
            ),
    )
    .subcommand(
        Command::new("check")
            .about("Assemble a program and report problems without running it")
            .arg(file_arg())
            .arg(
                Arg::new("format")
                    .help("Report format")
                    .short('f')
                    .long("format")
                    .default_value("text")
                    .value_parser(["text", "json"])
                    .value_name("FORMAT"),
            ),
    )
    .subcommand(
        Command::new("list")
            .about("Print the assembled program listing")
            .arg(file_arg()),
    )
    .subcommand(
        Command::new("sample")
            .about("Print a built-in sample program")
            .arg(
                Arg::new("name")
                    .help("Which sample to print")
                    .default_value("hello")
                    .value_parser(["hello", "echo"])
                    .index(1),
            ),
    )
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> ExitCode {
    let config = match load_config(matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("[ERROR]").red().bold(), e);
            return ExitCode::from(EXIT_LOAD);
        }
    };

    match matches.subcommand() {
        Some(("run", sub_m)) => cmd_run(sub_m, config),
        Some(("step", sub_m)) => cmd_step(sub_m, config),
        Some(("check", sub_m)) => cmd_check(sub_m, &config),
        Some(("list", sub_m)) => cmd_list(sub_m, &config),
        Some(("sample", sub_m)) => {
            let name = sub_m.get_one::<String>("name").map(String::as_str);
            let source = match name {
                Some("echo") => samples::ECHO,
                _ => samples::HELLO,
            };
            print!("{}", source);
            ExitCode::SUCCESS
        }
        _ => {
            println!("No valid subcommand was used. Use --help for more information.");
            ExitCode::SUCCESS
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<VmConfig, String> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => VmConfig::load_from_file(path),
        None => Ok(VmConfig::default()),
    }
}

fn load_script(sub_m: &ArgMatches) -> Result<Script, ExitCode> {
    let Some(file) = sub_m.get_one::<String>("file") else {
        return Err(ExitCode::from(EXIT_LOAD));
    };
    Script::new(PathBuf::from(file)).map_err(|e| {
        eprint!("{}", Report::from(&e).render_with_source(""));
        ExitCode::from(EXIT_LOAD)
    })
}

/// Builds a machine for `config` and installs the script on it.
fn load_vm(script: &Script, config: VmConfig) -> Result<VM, ExitCode> {
    let mut vm = VM::with_config(config).map_err(|e| {
        eprintln!("{} {}", style("[ERROR]").red().bold(), e);
        ExitCode::from(EXIT_LOAD)
    })?;
    vm.load_script(script).map_err(|e| {
        print_error(&e, &script.content);
        ExitCode::from(EXIT_LOAD)
    })?;
    Ok(vm)
}

fn print_error(error: &VmError, source: &str) {
    eprint!("{}", Report::from(error).render_with_source(source));
}

fn read_input(sub_m: &ArgMatches) -> Result<String, ExitCode> {
    if let Some(path) = sub_m.get_one::<PathBuf>("input-file") {
        return fs::read_to_string(path).map_err(|e| {
            let message = format!("Cannot read input file '{}': {}", path.display(), e);
            eprint!("{}", Report::error(&message, Some(E_IO)).render_with_source(""));
            ExitCode::from(EXIT_LOAD)
        });
    }
    Ok(sub_m.get_one::<String>("input").cloned().unwrap_or_default())
}

#[derive(Serialize)]
struct RunDump {
    steps: Option<usize>,
    error: Option<String>,
    snapshot: Snapshot,
}

fn cmd_run(sub_m: &ArgMatches, config: VmConfig) -> ExitCode {
    let script = match load_script(sub_m) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let input = match read_input(sub_m) {
        Ok(i) => i,
        Err(code) => return code,
    };
    let mut vm = match load_vm(&script, config) {
        Ok(vm) => vm,
        Err(code) => return code,
    };
    vm.set_input(&input);

    let result = vm.run();
    print!("{}", vm.get_output());

    match sub_m.get_one::<String>("dump").map(String::as_str) {
        Some("state") => {
            println!("{}", render::registers_table(&vm));
            println!("{}", render::memory_table(&vm));
        }
        Some("json") => {
            let dump = RunDump {
                steps: result.as_ref().ok().map(|status| status.steps),
                error: result.as_ref().err().map(|e| e.to_string()),
                snapshot: vm.snapshot(),
            };
            match serde_json::to_string_pretty(&dump) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("failed to serialise machine state: {}", e),
            }
        }
        _ => {}
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e, &script.content);
            ExitCode::from(EXIT_EXEC)
        }
    }
}

fn cmd_step(sub_m: &ArgMatches, config: VmConfig) -> ExitCode {
    let script = match load_script(sub_m) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let input = match read_input(sub_m) {
        Ok(i) => i,
        Err(code) => return code,
    };
    let count = sub_m.get_one::<usize>("count").copied().unwrap_or(20);
    let mut vm = match load_vm(&script, config) {
        Ok(vm) => vm,
        Err(code) => return code,
    };
    vm.set_input(&input);

    let mut trace = render::trace_table(vm.config().register_count);
    let mut failure = None;
    for n in 1..=count {
        if vm.halted() {
            break;
        }
        let pc = vm.pc();
        let (line, text) = match vm.current_instruction() {
            Some(instr) => (instr.line, instr.to_string()),
            None => (0, String::new()),
        };
        let outcome = vm.step();
        render::push_trace_row(&mut trace, n, pc, line, &text, &vm);
        if let Err(e) = outcome {
            failure = Some(e);
            break;
        }
    }

    println!("{}", trace);
    let output = vm.get_output();
    if !output.is_empty() {
        println!("{} {:?}", style("output:").bold(), output);
    }
    if !vm.halted() {
        println!("{}", style(format!("stopped after {} steps", count)).yellow());
    }

    match failure {
        Some(e) => {
            print_error(&e, &script.content);
            ExitCode::from(EXIT_EXEC)
        }
        None => ExitCode::SUCCESS,
    }
}

/// Parses the script and collects every static problem into reports.
fn collect_reports(script: &Script, config: &VmConfig) -> (Option<Program>, ReportCollector) {
    let mut collector = ReportCollector::new();
    match tinyvm_core::asm::parse_script(script) {
        Ok(program) => {
            collector.extend(check(&program, config).iter().map(Report::from));
            (Some(program), collector)
        }
        Err(e) => {
            collector.push(Report::from(&VmError::from(e)));
            (None, collector)
        }
    }
}

fn cmd_check(sub_m: &ArgMatches, config: &VmConfig) -> ExitCode {
    let script = match load_script(sub_m) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let (program, collector) = collect_reports(&script, config);

    if sub_m.get_one::<String>("format").map(String::as_str) == Some("json") {
        match collector.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialise reports: {}", e),
        }
    } else if collector.is_empty() {
        let count = program.map(|p| p.len()).unwrap_or(0);
        println!(
            "{} {}: {} instructions, no problems found",
            style("ok").green().bold(),
            script.name,
            count
        );
    } else {
        eprint!("{}", collector.render_all(&script.content));
        let (fatal, errors, warnings, _) = collector.counts();
        eprintln!("{} error(s), {} warning(s)", fatal + errors, warnings);
    }

    if collector.has_errors() {
        ExitCode::from(EXIT_LOAD)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_list(sub_m: &ArgMatches, config: &VmConfig) -> ExitCode {
    let script = match load_script(sub_m) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match tinyvm_core::asm::parse_script(&script) {
        Ok(program) => {
            print!("{}", listing::render_listing(&program, config));
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&VmError::from(e), &script.content);
            ExitCode::from(EXIT_LOAD)
        }
    }
}
