//! The compiler driver.
//!
//! Wires the pipeline together: load the source file, parse it, check
//! and monomorphize it, emit C next to the input. Diagnostics are
//! buffered and flushed in source order before the process exits.

use colored::Colorize;
use diagnostics::{
    error::Result,
    reporter::ErasedReportedError,
    Diag, Reporter,
};
use span::SourceMap;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
};

pub fn main() -> Result {
    // exactly one positional argument, the path of the source file
    let mut args = std::env::args_os().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        return Err(ErasedReportedError::new_unchecked());
    };
    let path = PathBuf::from(path);

    let map: Arc<RwLock<SourceMap>> = Arc::default();
    let reported_any_errors: Arc<AtomicBool> = Arc::default();
    let reporter = Reporter::buffered_stderr(reported_any_errors.clone()).with_map(map.clone());

    let result = compile(&path, &map, &reporter);

    // flush the buffered diagnostics
    drop(reporter);

    if reported_any_errors.load(Ordering::SeqCst) {
        return Err(ErasedReportedError::new_unchecked());
    }
    result?;

    println!("{}", "success".green().bold());
    Ok(())
}

fn compile(path: &Path, map: &Arc<RwLock<SourceMap>>, reporter: &Reporter) -> Result {
    let file = match map.write().unwrap().load(path.to_owned()) {
        Ok(file) => file,
        Err(error) => {
            return Err(Diag::error()
                .message(format!("could not load \u{2018}{}\u{2019}", path.display()))
                .note(error.to_string())
                .path(path.to_owned())
                .report(reporter));
        }
    };

    let map = map.read().unwrap();
    let ast = parser::parse(file, &map, reporter)?;
    let program = typer::check(&ast, path, reporter)?;

    let output = codegen_c::emit(&program);
    let output_path = {
        let mut output_path = OsString::from(path);
        output_path.push(".c");
        PathBuf::from(output_path)
    };

    if let Err(error) = std::fs::write(&output_path, output) {
        return Err(Diag::error()
            .message(format!(
                "could not write \u{2018}{}\u{2019}",
                output_path.display()
            ))
            .note(error.to_string())
            .path(output_path)
            .report(reporter));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::compile;
    use diagnostics::Reporter;
    use span::SourceMap;
    use std::sync::{Arc, RwLock};

    fn run(source: &str) -> (tempfile::TempDir, diagnostics::error::Result) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.mica");
        std::fs::write(&path, source).unwrap();

        let map = Arc::new(RwLock::new(SourceMap::default()));
        let rep = Reporter::silent();
        let result = compile(&path, &map, &rep);

        (dir, result)
    }

    #[test]
    fn compilation_writes_c_next_to_the_input() {
        let (dir, result) = run("func main() { let x = 1 + 2; }");
        result.unwrap();

        let output = std::fs::read_to_string(dir.path().join("demo.mica.c")).unwrap();
        assert!(output.contains("int main(void)"));
        assert!(output.contains("(1 + 2)"));
    }

    #[test]
    fn no_c_file_is_written_on_semantic_errors() {
        let (dir, result) = run("func main() { let x: Int = y; }");
        assert!(result.is_err());

        assert!(!dir.path().join("demo.mica.c").exists());
    }

    #[test]
    fn no_c_file_is_written_on_parse_errors() {
        let (dir, result) = run("func main() { let x = 1 }");
        assert!(result.is_err());

        assert!(!dir.path().join("demo.mica.c").exists());
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let map = Arc::new(RwLock::new(SourceMap::default()));
        let rep = Reporter::silent();

        let result = compile(&dir.path().join("missing.mica"), &map, &rep);
        assert!(result.is_err());
    }
}
