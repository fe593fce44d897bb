use std::env;
use std::path::PathBuf;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches};
use serde_json::json;
use thousands::Separable;

mod analyze;
mod error;
mod history;
mod store;

use analyze::{AliasSuggestion, CommandRecord, TypoCandidate};
use error::RecapError;
use store::CommandStore;

const DEFAULT_DB: &str = "bash_history.db";

fn run(matches: &ArgMatches) -> Result<(), RecapError> {
    let quiet = matches.is_present("quiet");

    let top = match matches.value_of("top") {
        Some(raw) => {
            let n: i64 = raw.parse().map_err(|_| {
                RecapError::Validation(format!("--top expects an integer, got '{}'", raw))
            })?;
            if n < 0 {
                return Err(RecapError::Validation(format!(
                    "--top must not be negative, got {}",
                    n
                )));
            }
            n as usize
        }
        None => analyze::DEFAULT_TOP_N,
    };

    let history_path = match matches.value_of("file") {
        Some(file) => PathBuf::from(file),
        None => {
            let home = env::var("HOME").map_err(|_| {
                RecapError::Input("HOME is not set and no history file was given".to_string())
            })?;
            PathBuf::from(home).join(".bash_history")
        }
    };

    if !quiet {
        eprintln!("Analyzing {}...", history_path.display());
    }

    let history_text = history::load_history(&history_path)?;
    let commands = history::parse_history(&history_text);
    if commands.is_empty() {
        return Err(RecapError::Input(format!(
            "no commands found in {}",
            history_path.display()
        )));
    }

    let db_path = PathBuf::from(matches.value_of("db").unwrap_or(DEFAULT_DB));
    let mut store = CommandStore::open(&db_path)?;
    store.record_all(commands.iter().map(String::as_str))?;
    let records = store.all_records()?;

    let top_commands = analyze::top_n(&records, top);
    let typos = analyze::detect_typos(&records, analyze::HIGH_FREQ_CUTOFF);
    let aliases =
        analyze::suggest_aliases(&records, analyze::ALIAS_MIN_LEN, analyze::ALIAS_MIN_FREQ);

    if matches.is_present("json") {
        print_json(&top_commands, &typos, &aliases);
    } else if matches.is_present("bare") {
        print_bare(&top_commands, &typos, &aliases);
    } else {
        print_report(&top_commands, &typos, &aliases);
    }

    Ok(())
}

fn print_json(top: &[CommandRecord], typos: &[TypoCandidate], aliases: &[AliasSuggestion]) {
    let result = json!({
        "top_commands": top,
        "typo_candidates": typos,
        "alias_suggestions": aliases,
    });
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}

fn print_report(top: &[CommandRecord], typos: &[TypoCandidate], aliases: &[AliasSuggestion]) {
    println!("\n\x1b[1;34m=== HISTORY REPORT ===\x1b[0m");

    println!("\n\x1b[1mMost Frequent Commands:\x1b[0m");
    for (i, record) in top.iter().enumerate() {
        println!(
            "{:>3}. {} ({}x)",
            i + 1,
            record.command,
            record.frequency.separate_with_commas()
        );
    }

    println!("\n\x1b[1mLikely Typos:\x1b[0m");
    if typos.is_empty() {
        println!("none found");
    } else {
        for typo in typos {
            println!("- '{}' -> did you mean '{}'?", typo.suspect, typo.reference);
        }
    }

    println!("\n\x1b[1mAlias Candidates:\x1b[0m");
    if aliases.is_empty() {
        println!("none found");
    } else {
        for alias in aliases {
            println!(
                "- alias {}='{}'  ({} uses)",
                alias.suggested_alias,
                alias.command,
                alias.frequency.separate_with_commas()
            );
        }
    }
}

fn print_bare(top: &[CommandRecord], typos: &[TypoCandidate], aliases: &[AliasSuggestion]) {
    println!("TOP COMMANDS");
    println!("------------");
    for (i, record) in top.iter().enumerate() {
        println!("{}. {} ({})", i + 1, record.command, record.frequency);
    }

    println!("\nTYPO CANDIDATES");
    println!("---------------");
    for typo in typos {
        println!("{} -> {}", typo.suspect, typo.reference);
    }

    println!("\nALIAS SUGGESTIONS");
    println!("-----------------");
    for alias in aliases {
        println!(
            "{}={} ({})",
            alias.suggested_alias, alias.command, alias.frequency
        );
    }
}

fn main() {
    let matches = App::new("recap")
        .version("0.1")
        .about("Frequency and typo analysis for your shell history")
        .setting(AppSettings::ColoredHelp)
        .arg(
            Arg::with_name("file")
                .value_name("FILE")
                .help("History file to analyze (default: ~/.bash_history)")
                .index(1),
        )
        .arg(
            Arg::with_name("db")
                .long("db")
                .value_name("FILE")
                .help("Database file for parsed commands")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("top")
                .short("t")
                .long("top")
                .value_name("N")
                .help("How many top commands to list")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("json")
                .short("j")
                .long("json")
                .help("Output in JSON format"),
        )
        .arg(
            Arg::with_name("bare")
                .short("r")
                .long("bare")
                .help("Plain text output without formatting"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Suppress progress output"),
        )
        .after_help(
            "EXAMPLES:\n  recap                      # Analyze ~/.bash_history\n  recap ~/.zsh_history       # Analyze another history file\n  recap -j                   # JSON report\n  recap --top 10             # Only the ten most frequent commands",
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_end_to_end() {
        let lines = "git status\ngti status\ngit status\n#123\n ls\n";
        let commands = history::parse_history(lines);
        assert_eq!(commands, vec!["git status", "gti status", "git status"]);

        let mut store = CommandStore::open_in_memory().unwrap();
        store
            .record_all(commands.iter().map(String::as_str))
            .unwrap();
        let records = store.all_records().unwrap();
        assert_eq!(records.len(), 2);

        let top = analyze::top_n(&records, 1);
        assert_eq!(top[0].command, "git status");
        assert_eq!(top[0].frequency, 2);

        // Cutoff 2: "git status" (freq 2) is frequent, "gti status" rare //
        let typos = analyze::detect_typos(&records, 2);
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].suspect, "gti");
        assert_eq!(typos[0].reference, "git");
        assert_eq!(typos[0].distance, 1);
    }
}
