use std::io::{self, BufRead, Write};

/// Print `question` and read one trimmed line from stdin.
pub fn ask(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{question}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Yes/no question; only "yes" (any case) counts as yes.
pub fn confirm(question: &str) -> io::Result<bool> {
    Ok(ask(question)?.to_lowercase() == "yes")
}
