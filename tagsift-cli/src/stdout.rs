/// Prints the heading for a file, being its path followed by the tag format it was read from.
#[macro_export]
macro_rules! print_header {
    ($path:expr, $format:expr) => {{
        use std::io::Write;
        use termcolor::{StandardStream, ColorChoice, Color, ColorSpec, WriteColor};

        let mut stdout = StandardStream::stdout(ColorChoice::Auto);

        let _ = stdout.set_color(
            ColorSpec::new()
                .set_bold(true)
                .set_intense(true)
                .set_fg(Some(Color::Blue))
        );

        let _ = write![&mut stdout, "{}", $path.display()];
        let _ = stdout.set_color(ColorSpec::new().set_dimmed(true));
        let _ = writeln![&mut stdout, " [{}]", $format];
        let _ = stdout.reset();
    }};
}

#[macro_export]
macro_rules! print_entry {
    ($($arg:tt)+) => {{
        use std::io::Write;
        use termcolor::{StandardStream, ColorChoice, Color, ColorSpec, WriteColor};

        let mut stdout = StandardStream::stdout(ColorChoice::Auto);

        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        let _ = write![&mut stdout, $($arg)+];
        let _ = stdout.reset();
    }};
}

#[macro_export]
macro_rules! errorln {
    ($($arg:tt)+) => {{
        use std::io::Write;
        use termcolor::{StandardStream, ColorChoice, Color, ColorSpec, WriteColor};

        let mut stderr = StandardStream::stderr(ColorChoice::Auto);

        let _ = stderr.set_color(
            ColorSpec::new()
                .set_fg(Some(Color::Red))
                .set_bold(true)
        );

        let _ = write![&mut stderr, "error"];
        let _ = stderr.reset();
        let _ = write![&mut stderr, ": "];
        let _ = writeln![&mut stderr, $($arg)+];
    }};
}
