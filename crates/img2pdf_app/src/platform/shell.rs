use std::path::PathBuf;

use img2pdf_core::{ConvertMode, Msg};

use super::app::AppInput;
use super::files::source_files;

pub const HELP: &str = "\
Commands:
  add <path>...      add image files (duplicates and non-images are skipped);
                     quote paths that contain spaces: add \"my scans/a.png\"
  rm <index>         remove the file at <index>
  clear              remove all files
  mode <merged|individual>
  name <base name>   output name without extension
  quality <1-100>    JPEG quality used by the service
  convert            upload and convert the current files
  cancel             cancel the running conversion
  list               show files and options
  help               show this text
  quit               leave the shell";

/// Turn one typed line into inputs for the owner loop. `add` reads file
/// metadata here, off the owner thread.
pub fn parse_line(line: &str) -> Vec<AppInput> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "" => Vec::new(),
        "add" => parse_add(rest),
        "rm" | "remove" => match rest.parse::<usize>() {
            Ok(index) => vec![AppInput::Core(Msg::RemoveFileClicked(index))],
            Err(_) => usage("rm <index>"),
        },
        "clear" => vec![AppInput::Core(Msg::ClearClicked)],
        "mode" => match rest.parse::<ConvertMode>() {
            Ok(mode) => vec![AppInput::Core(Msg::ModeSelected(mode))],
            Err(err) => vec![AppInput::Alert(err.to_string())],
        },
        "name" => vec![AppInput::Core(Msg::BaseNameEdited(rest.to_string()))],
        "quality" => match rest.parse::<u8>() {
            Ok(value) => vec![AppInput::Core(Msg::QualityChanged(value))],
            Err(_) => usage("quality <1-100>"),
        },
        "convert" => vec![AppInput::Core(Msg::ConvertClicked)],
        "cancel" => vec![AppInput::Core(Msg::CancelClicked)],
        "list" | "ls" => vec![AppInput::List],
        "help" | "?" => vec![AppInput::Help],
        "quit" | "exit" => vec![AppInput::Quit],
        other => vec![AppInput::Alert(format!(
            "unknown command {other:?}; type help"
        ))],
    }
}

fn parse_add(rest: &str) -> Vec<AppInput> {
    let paths: Vec<PathBuf> = match split_words(rest) {
        Ok(words) => words.into_iter().map(PathBuf::from).collect(),
        Err(err) => return vec![AppInput::Alert(err)],
    };
    if paths.is_empty() {
        return usage("add <path>...");
    }
    let (picked, skipped) = source_files(&paths);
    let mut inputs: Vec<AppInput> = skipped
        .into_iter()
        .map(|path| AppInput::Alert(format!("skipped {}: not a readable file", path.display())))
        .collect();
    if !picked.is_empty() {
        inputs.push(AppInput::Core(Msg::FilesPicked(picked)));
    }
    inputs
}

/// Whitespace-separated words; single or double quotes keep spaces inside
/// one word. No escapes, so Windows paths pass through unchanged.
fn split_words(input: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(open) = quote {
        return Err(format!("unterminated {open} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn usage(text: &str) -> Vec<AppInput> {
    vec![AppInput::Alert(format!("usage: {text}"))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn simple_commands() {
        assert!(parse_line("  ").is_empty());
        assert_eq!(parse_line("clear"), vec![AppInput::Core(Msg::ClearClicked)]);
        assert_eq!(parse_line("CONVERT"), vec![AppInput::Core(Msg::ConvertClicked)]);
        assert_eq!(parse_line("rm 2"), vec![AppInput::Core(Msg::RemoveFileClicked(2))]);
        assert_eq!(
            parse_line("mode Individual"),
            vec![AppInput::Core(Msg::ModeSelected(ConvertMode::Individual))]
        );
        assert_eq!(parse_line("quit"), vec![AppInput::Quit]);
    }

    #[test]
    fn name_keeps_inner_spaces() {
        assert_eq!(
            parse_line("name  holiday photos "),
            vec![AppInput::Core(Msg::BaseNameEdited(
                "holiday photos".to_string()
            ))]
        );
    }

    #[test]
    fn bad_arguments_become_alerts() {
        assert_eq!(
            parse_line("rm x"),
            vec![AppInput::Alert("usage: rm <index>".to_string())]
        );
        assert_eq!(
            parse_line("quality 300"),
            vec![AppInput::Alert("usage: quality <1-100>".to_string())]
        );
        assert!(matches!(parse_line("mode zip").as_slice(), [AppInput::Alert(_)]));
        assert!(matches!(parse_line("frobnicate").as_slice(), [AppInput::Alert(_)]));
    }

    #[test]
    fn words_honour_quotes() {
        assert_eq!(
            split_words(r#"a.png "my scans/b.png" 'c d.jpg'"#).unwrap(),
            vec!["a.png", "my scans/b.png", "c d.jpg"]
        );
        assert_eq!(
            split_words(r"C:\pics\e.png").unwrap(),
            vec![r"C:\pics\e.png"]
        );
        assert_eq!(split_words(r#""""#).unwrap(), vec![""]);
        assert!(split_words(r#""open.png"#).is_err());
    }

    #[test]
    fn add_accepts_quoted_path_with_spaces() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("holiday scans");
        std::fs::create_dir(&dir).unwrap();
        let image = dir.join("beach day.png");
        std::fs::write(&image, b"png").unwrap();

        let inputs = parse_line(&format!("add \"{}\"", image.display()));

        match inputs.as_slice() {
            [AppInput::Core(Msg::FilesPicked(files))] => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].name, "beach day.png");
            }
            other => panic!("unexpected inputs {other:?}"),
        }
    }

    #[test]
    fn add_with_unterminated_quote_is_an_alert() {
        assert_eq!(
            parse_line(r#"add "a.png"#),
            vec![AppInput::Alert("unterminated \" quote".to_string())]
        );
    }

    #[test]
    fn add_describes_files_and_reports_skips() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("a.png");
        std::fs::write(&image, b"png").unwrap();
        let missing = temp.path().join("nope.png");

        let inputs = parse_line(&format!("add {} {}", image.display(), missing.display()));

        assert_eq!(inputs.len(), 2);
        assert!(matches!(&inputs[0], AppInput::Alert(text) if text.contains("nope.png")));
        match &inputs[1] {
            AppInput::Core(Msg::FilesPicked(files)) => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].name, "a.png");
            }
            other => panic!("unexpected input {other:?}"),
        }
    }
}
