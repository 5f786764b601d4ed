use parlance::{Output, ParseDetails, PassMetrics, fulltext};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";
    pub const UNDERLINE: &str = "\x1b[4m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.paint(s, BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.paint(s, DIM)
        }
    }
}

pub fn print_run(details: &ParseDetails<'_>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", details.input), ansi::CYAN)));

    if !details.extensions.is_empty() {
        println!("   {} {}", palette.dim("extensions:"), palette.paint(details.extensions.join(", "), ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Interpretations ━━━", ansi::GRAY));
    if details.outputs.is_empty() {
        println!("{}", palette.dim("  No interpretations"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The input is not a prefix of any command (try --fuzzy)");
        println!("  • Letter case differs (try --ignore-case)");
        println!("  • A phrase filter rejected every candidate");
        println!("\n{}", palette.dim("  Tip: Set PARLANCE_LOG=trace to see pruning and extension decisions"));
    } else {
        for (idx, output) in details.outputs.iter().enumerate() {
            print_output(idx, output, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Pass ━━━", ansi::GRAY));
    print_metrics(&details.metrics, &palette);
    println!();
}

fn print_output(idx: usize, output: &Output<'_>, palette: &ansi::Palette) {
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        render_segments(output, palette),
        palette.dim("│"),
        palette.paint(format!("score {:.3}", output.score), ansi::YELLOW),
    );
    println!(
        "      {} {}  {} {}",
        palette.dim("value:"),
        palette.paint(output.result.to_string(), ansi::GREEN),
        palette.dim("│ completes:"),
        palette.paint(format!("{:?}", fulltext::suggestion(output)), ansi::CYAN),
    );
}

/// Typed text bold, suggested text dim, word starts underlined.
fn render_segments(output: &Output<'_>, palette: &ansi::Palette) -> String {
    output
        .segments
        .iter()
        .map(|segment| {
            let text = if segment.is_input { palette.bold(&segment.text) } else { palette.dim(&segment.text) };
            if segment.starts_word && segment.is_input { palette.paint(text, ansi::UNDERLINE) } else { text }
        })
        .collect()
}

fn print_metrics(metrics: &PassMetrics, palette: &ansi::Palette) {
    println!(
        "  {} {}  │  {} {}  │  {} {}",
        palette.dim("nodes:"),
        palette.paint(metrics.nodes_visited.to_string(), ansi::BLUE),
        palette.dim("literals:"),
        palette.paint(metrics.literal_attempts.to_string(), ansi::BLUE),
        palette.dim("outputs:"),
        palette.paint(metrics.outputs.to_string(), ansi::GREEN),
    );
    println!(
        "  {} {}  │  {} {}  │  {} {}",
        palette.dim("pruned:"),
        palette.paint(metrics.pruned_recursions.to_string(), ansi::YELLOW),
        palette.dim("filtered:"),
        palette.paint(metrics.filtered.to_string(), ansi::YELLOW),
        palette.dim("depth:"),
        palette.paint(metrics.max_phrase_depth.to_string(), ansi::YELLOW),
    );
    println!("  Total: {}", palette.paint(format!("{:?}", metrics.elapsed), ansi::GREEN));
}
