use std::{env::args, io::{self, Write}, path::{Path, PathBuf}, process::ExitCode};

use ls8_core_emulator::{Core, Fault, MachineConfig, device::{ConsoleDevice, Device}};
use ls8_utils::{LoadError, disassemble, load_program_file};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("usage: ls8 <program-file>")]
    Usage,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("machine fault: {0}")]
    Fault(#[from] Fault),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = args().skip(1).collect::<Vec<_>>();
    let result = program_path(&args)
        .and_then(|path| run(&path, ConsoleDevice::new(), &MachineConfig::from_env()));

    ExitCode::from(exit_status(result, &mut io::stderr()).unwrap_or(1))
}

/// Reports a failed run straight to `stderr`, so it's seen even with logging turned off.
fn exit_status<T>(result: Result<T, CliError>, stderr: &mut impl Write) -> io::Result<u8> {
    match result {
        Ok(_) => Ok(0),
        Err(e) => {
            writeln!(stderr, "ls8: {e}")?;
            Ok(1)
        }
    }
}

/// The only argument is the program to run.
fn program_path(args: &[String]) -> Result<PathBuf, CliError> {
    match args {
        [path] => Ok(PathBuf::from(path)),
        _ => Err(CliError::Usage),
    }
}

/// Loads and runs a program until it halts, returning the device so its output can be inspected.
fn run<D: Device>(path: &Path, device: D, config: &MachineConfig) -> Result<D, CliError> {
    let image = load_program_file(path)?;
    for line in disassemble(&image.bytes) {
        debug!("{line}");
    }

    let mut core = Core::with_device(device, config);
    core.load_rom(&image.bytes)?;
    core.execute_until_halt()?;

    Ok(core.device)
}
