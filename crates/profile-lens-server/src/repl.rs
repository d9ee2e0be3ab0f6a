//! Interactive REPL for ProfileLens.
//!
//! Launch with `profile-lens repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use profile_lens::{LookupResponse, Platform};

use crate::service::ProfileLens;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/extract", "Look up a profile URL"),
    ("/facebook", "Look up a Facebook handle"),
    ("/instagram", "Look up an Instagram handle"),
    ("/manual", "Extract from saved page source: /manual <url> <file>"),
    ("/rules", "Show the active extraction rules"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct LensHelper;

impl Completer for LensHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // saved page source for /manual's second argument
        if let Some(rest) = input.strip_prefix("/manual ") {
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            let partial = if input.ends_with(' ') {
                ""
            } else {
                tokens.last().copied().unwrap_or("")
            };
            let on_file_arg = if partial.is_empty() {
                tokens.len() == 1
            } else {
                tokens.len() == 2
            };
            if on_file_arg {
                let mut files = Vec::new();
                if let Ok(entries) = std::fs::read_dir(".") {
                    for entry in entries.flatten() {
                        let path = entry.path();
                        if path
                            .extension()
                            .is_some_and(|e| e == "html" || e == "htm" || e == "txt")
                        {
                            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                                files.push(name.to_string());
                            }
                        }
                    }
                }
                files.sort();
                let matches: Vec<Pair> = files
                    .iter()
                    .filter(|f| f.starts_with(partial))
                    .map(|f| Pair {
                        display: f.clone(),
                        replacement: format!("{f} "),
                    })
                    .collect();
                return Ok((pos - partial.len(), matches));
            }
        }

        Ok((pos, Vec::new()))
    }
}

/// Inline hint: the rest of a command name, or the arguments a command
/// takes once it has been typed. Only the former can be accepted with Tab.
struct LensHint {
    text: String,
    accepts: bool,
}

impl Hint for LensHint {
    fn display(&self) -> &str {
        &self.text
    }

    fn completion(&self) -> Option<&str> {
        self.accepts.then_some(self.text.as_str())
    }
}

/// Argument synopsis for commands that take arguments.
fn arg_usage(cmd: &str) -> Option<&'static str> {
    match cmd {
        "/extract" => Some("<url>"),
        "/facebook" | "/instagram" => Some("<handle>"),
        "/manual" => Some("<url> <html-file>"),
        _ => None,
    }
}

fn hint_for(line: &str) -> Option<LensHint> {
    if !line.starts_with('/') {
        return None;
    }
    match line.split_once(' ') {
        None => COMMANDS
            .iter()
            .map(|(cmd, _)| *cmd)
            .find(|cmd| cmd.starts_with(line) && *cmd != line)
            .map(|cmd| LensHint {
                text: cmd[line.len()..].to_string(),
                accepts: true,
            }),
        Some((cmd, "")) => arg_usage(cmd).map(|usage| LensHint {
            text: usage.to_string(),
            accepts: false,
        }),
        Some(_) => None,
    }
}

impl Hinter for LensHelper {
    type Hint = LensHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<LensHint> {
        if pos < line.len() {
            return None;
        }
        hint_for(line)
    }
}

impl Highlighter for LensHelper {}
impl Validator for LensHelper {}
impl Helper for LensHelper {}

/// Tab accepts a command-name hint, otherwise runs completion.
struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        let usage_hint = ctx.hint_text().is_some_and(|h| h.starts_with('<'));
        if ctx.has_hint() && !usage_hint {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// One parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Extract(&'a str),
    Handle(Platform, &'a str),
    Manual(&'a str, &'a str),
    Rules,
    Help,
    Clear,
    Exit,
    Usage(&'static str),
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let Some(input) = line.strip_prefix('/') else {
        return Command::Extract(line);
    };
    if input.is_empty() {
        return Command::Help;
    }

    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match cmd {
        "exit" | "quit" => Command::Exit,
        "help" | "h" | "?" => Command::Help,
        "clear" | "cls" => Command::Clear,
        "rules" => Command::Rules,
        "extract" | "x" if args.is_empty() => Command::Usage("/extract <url>"),
        "extract" | "x" => Command::Extract(args),
        "facebook" | "fb" if args.is_empty() => Command::Usage("/facebook <handle>"),
        "facebook" | "fb" => Command::Handle(Platform::Facebook, args),
        "instagram" | "ig" if args.is_empty() => Command::Usage("/instagram <handle>"),
        "instagram" | "ig" => Command::Handle(Platform::Instagram, args),
        "manual" => {
            let mut it = args.split_whitespace();
            match (it.next(), it.next()) {
                (Some(url), Some(file)) => Command::Manual(url, file),
                _ => Command::Usage("/manual <url> <html-file>"),
            }
        }
        other => Command::Unknown(other),
    }
}

/// Run the interactive REPL.
pub async fn run(lens: ProfileLens) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mprofile-lens v{}\x1b[0m \x1b[90m: profile IDs from public pages\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Paste a profile URL, or press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<LensHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(LensHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".profile_lens_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mlens>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match parse_line(line) {
                    Command::Exit => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    Command::Help => cmd_help(),
                    Command::Clear => eprint!("\x1b[2J\x1b[H"),
                    Command::Rules => cmd_rules(&lens),
                    Command::Extract(input) => cmd_extract(&lens, input, None).await,
                    Command::Handle(platform, handle) => {
                        cmd_extract(&lens, handle, Some(platform)).await
                    }
                    Command::Manual(url, file) => cmd_manual(&lens, url, file),
                    Command::Usage(usage) => eprintln!("  Usage: {usage}"),
                    Command::Unknown(cmd) => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: anything not starting with / is looked up as a URL.");
    eprintln!();
}

fn cmd_rules(lens: &ProfileLens) {
    for platform in [Platform::Facebook, Platform::Instagram] {
        let rules = lens.rules().for_platform(platform);
        eprintln!();
        eprintln!("  {}:", platform.label());
        for field in [&rules.id, &rules.name, &rules.username, &rules.photo] {
            eprintln!("    {:<10} {}", field.field(), field.names().join(" > "));
        }
        let reserved: Vec<&str> = rules.reserved_usernames.iter().map(String::as_str).collect();
        eprintln!("    {:<10} {}", "reserved", reserved.join(", "));
    }
    eprintln!();
}

async fn cmd_extract(lens: &ProfileLens, input: &str, platform: Option<Platform>) {
    if platform.is_none() && !profile_lens::looks_like_url(input) {
        eprintln!("  '{input}' is not a URL. Use /facebook {input} or /instagram {input}.");
        return;
    }
    let resp = lens.respond(Some(input), platform).await;
    print_response(&resp, input);
}

fn cmd_manual(lens: &ProfileLens, url: &str, file: &str) {
    match std::fs::read_to_string(file) {
        Ok(html) => {
            let resp = lens.respond_manual(&html, url);
            print_response(&resp, url);
        }
        Err(e) => eprintln!("  Cannot read {file}: {e}"),
    }
}

fn print_response(resp: &LookupResponse, url: &str) {
    eprintln!();
    for line in crate::render::summary_lines(resp) {
        eprintln!("  {line}");
    }
    if resp.offers_manual_fallback() {
        eprintln!();
        eprintln!("  Save view-source:{url} from a logged-in browser, then:");
        eprintln!("    /manual {url} <saved-file>");
    }
    eprintln!();
}
