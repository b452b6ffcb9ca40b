use std::process::Command;

use tracing::{debug, warn};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::builtin::expect_args,
        },
        value::core::Value,
    },
};

/// `sh(command)`: runs `command` with `sh -c` and returns its standard output.
///
/// A non-zero exit status is logged and the captured output is still
/// returned. Output that is not valid UTF-8 is decoded lossily.
///
/// # Errors
/// - `Type` if the command is not a string.
/// - `Native` if the shell could not be started.
pub fn sh(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [command] = expect_args::<1>("sh", interpreter, args)?;
    let position = interpreter.call_site();
    let command = command.as_str("sh", position)?;

    debug!(command, "running shell command");
    let output = Command::new("sh").arg("-c")
                                   .arg(command)
                                   .output()
                                   .map_err(|e| RuntimeError::Native { name:     "sh".to_string(),
                                                                       details:  e.to_string(),
                                                                       position, })?;

    if !output.status.success() {
        warn!(command, status = %output.status, "shell command failed");
    }

    Ok(Value::Str(String::from_utf8_lossy(&output.stdout).into_owned()))
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn captures_stdout() {
        let mut interpreter = Interpreter::new();

        assert_eq!(interpreter.run("return sh('echo hi')").unwrap(), Value::from("hi\n"));
    }

    #[test]
    fn failing_commands_still_return_output() {
        let mut interpreter = Interpreter::new();

        assert_eq!(interpreter.run("return sh('printf partial; exit 3')").unwrap(),
                   Value::from("partial"));
    }
}
