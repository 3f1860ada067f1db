//! Quote file persistence
//!
//! Reads a quote file into a sequence of quotes and writes a sequence back
//! using an atomic replace with backup:
//!
//! 1. Write every quote to a uniquely named temp file beside the target
//! 2. Refuse to continue if an existing backup is larger than the temp file
//! 3. Copy the current target to the backup, replacing any older backup
//! 4. Rename the temp file over the target
//!
//! Files (for a target `quotes.txt`):
//! - `.quotes.txt.jotquote.bak` - copy of the file before the last write
//! - `.quotes.txt<N>.jotquote.tmp` - transient, removed on failure
//!
//! No locking is done. Two processes writing the same file at once may
//! interleave arbitrarily.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{QuoteError, Result};
use crate::models::Quote;
use crate::parser::{format_quote, parse_quotes, QuoteFormat};

/// Suffix shared by backup and temp files
const FILE_SUFFIX: &str = "jotquote";

/// Any of `\r\n`, `\n` or a lone `\r` ends a line
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid regex"));

/// Read and parse a quote file
///
/// Fails with `NotFound` if the file does not exist, `Syntax` for the first
/// line that does not parse, and `Duplicate` if two quotes share their text.
pub fn read_quotes(path: &Path) -> Result<Vec<Quote>> {
    if !path.exists() {
        return Err(QuoteError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content =
        fs::read_to_string(path).map_err(|e| QuoteError::from_io(e, path.to_path_buf()))?;
    let source_name = path.display().to_string();

    let quotes = parse_quotes(LINE_BREAK.split(&content), &source_name, QuoteFormat::Extended)?;
    check_for_duplicates(&quotes, &source_name)?;

    debug!("Read {} quotes from {:?}", quotes.len(), path);
    Ok(quotes)
}

/// Fail on the first quote whose text already appeared earlier in the list
pub fn check_for_duplicates(quotes: &[Quote], source_name: &str) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for (index, quote) in quotes.iter().enumerate() {
        if !seen.insert(quote.text()) {
            return Err(QuoteError::Duplicate {
                line: index + 1,
                source_name: source_name.to_string(),
                text: quote.text().to_string(),
            });
        }
    }
    Ok(())
}

/// Atomically overwrite a quote file with the given quotes
///
/// The line terminator comes from `config.line_separator` and is validated
/// before the file system is touched. On any failure the target file is left
/// exactly as it was.
pub fn write_quotes(path: &Path, quotes: &[Quote], config: &Config) -> Result<()> {
    let newline = config.line_terminator()?;

    replace_file(path, |out| {
        for quote in quotes {
            out.write_all(format_quote(quote).as_bytes())?;
            out.write_all(newline.as_bytes())?;
        }
        Ok(())
    })?;

    info!("Wrote {} quotes to {:?}", quotes.len(), path);
    Ok(())
}

/// Path of the backup kept beside a quote file
pub fn backup_path(path: &Path) -> PathBuf {
    let (dir, name) = split_path(path);
    dir.join(format!(".{}.{}.bak", name, FILE_SUFFIX))
}

/// Pick a temp file name in `dir` that does not exist yet
///
/// Keeping the temp file in the target's directory keeps the final rename
/// on one file system.
pub fn available_temp_path(dir: &Path, file_name: &str) -> PathBuf {
    let mut rng = rand::rng();
    first_free_temp_path(dir, file_name, || rng.random_range(0..100_000_000))
}

fn first_free_temp_path<F>(dir: &Path, file_name: &str, mut next_suffix: F) -> PathBuf
where
    F: FnMut() -> u32,
{
    loop {
        let candidate = dir.join(format!(".{}{}.{}.tmp", file_name, next_suffix(), FILE_SUFFIX));
        if !candidate.exists() {
            return candidate;
        }
    }
}

/// Replace `path` with whatever `write_contents` produces, keeping a backup
fn replace_file<F>(path: &Path, write_contents: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    if !path.exists() {
        return Err(QuoteError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let (dir, name) = split_path(path);
    let backup = backup_path(path);
    let temp = available_temp_path(&dir, &name);
    debug!("Writing temp file {:?}", temp);

    let fail = |source: io::Error| {
        discard(&temp);
        QuoteError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    };

    write_temp(&temp, write_contents).map_err(fail)?;

    // Sanity check backup size before overwriting backup
    if backup.exists() {
        let backup_len = fs::metadata(&backup).map_err(fail)?.len();
        let temp_len = fs::metadata(&temp).map_err(fail)?.len();
        if backup_len > temp_len {
            discard(&temp);
            warn!(
                "Backup {:?} ({} bytes) is larger than new file ({} bytes), aborting write",
                backup, backup_len, temp_len
            );
            return Err(QuoteError::BackupLarger {
                backup: file_name_of(&backup),
                file: name,
            });
        }
    }

    fs::copy(path, &backup).map_err(fail)?;
    info!("Backed up {:?} to {:?}", path, backup);

    fs::rename(&temp, path).map_err(fail)?;
    Ok(())
}

fn write_temp<F>(temp: &Path, write_contents: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(temp)?;
    let mut writer = BufWriter::new(file);
    write_contents(&mut writer)?;
    let file: File = writer.into_inner().map_err(|e| e.into_error())?;

    // Sync to disk before rename
    file.sync_all()
}

/// Best-effort removal of a temp file
fn discard(temp: &Path) {
    if temp.exists() {
        if let Err(e) = fs::remove_file(temp) {
            warn!("Failed to remove temp file {:?}: {}", temp, e);
        }
    }
}

/// Split a path into its (absolute where possible) directory and file name
fn split_path(path: &Path) -> (PathBuf, String) {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    (dir, file_name_of(&absolute))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const QUOTES1: &str = "\
The Linux philosophy is 'Laugh in the face of danger'. Oops. Wrong One. 'Do it yourself'. Yes, that's it. | Linus Torvalds |  | U
God writes a lot of comedy... the trouble is, he's stuck with so many bad actors who don't know how to play funny. | Garrison Keillor |  | U
I believe in looking reality straight in the eye and denying it. | Garrison Keillor |  | U
A book is a gift you can open again and again. | Garrison Keillor |  | U
";

    const QUOTES5: &str = "A book is a gift you can open again and again. | Garrison Keillor |  | U\n";

    fn unix_config() -> Config {
        Config {
            line_separator: Some("unix".to_string()),
            ..Config::default()
        }
    }

    fn init_quotefile(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn temp_files(temp_dir: &TempDir) -> Vec<String> {
        fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".jotquote.tmp"))
            .collect()
    }

    #[test]
    fn test_read_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);

        let quotes = read_quotes(&path).unwrap();
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes[0].author(), "Linus Torvalds");
        assert_eq!(quotes[3].tags(), &["U"]);
    }

    #[test]
    fn test_read_quotes_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fakename.txt");

        let err = read_quotes(&path).unwrap_err();
        assert!(matches!(err, QuoteError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            format!("the quote file '{}' was not found", path.display())
        );
    }

    #[test]
    fn test_read_quotes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "empty.txt", "");
        assert!(read_quotes(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_quotes_no_final_newline_and_crlf() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(
            &temp_dir,
            "quotes.txt",
            "# comment\r\n\r\nOne | A |  | \r\nTwo | B |  | ",
        );

        let quotes = read_quotes(&path).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].text(), "Two");
    }

    #[test]
    fn test_read_quotes_lone_carriage_returns() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "q.txt", "One | A |  | \rTwo | B |  | \r");

        let quotes = read_quotes(&path).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text(), "One");
        assert_eq!(quotes[1].author(), "B");
    }

    #[test]
    fn test_read_quotes_mixed_line_endings_keep_line_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "q.txt", "One | A |  | \r\nTwo | B |  | \rbroken\n");

        let err = read_quotes(&path).unwrap_err();
        assert!(matches!(err, QuoteError::Syntax { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_read_quotes_syntax_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(
            &temp_dir,
            "quotes7.txt",
            "One | A |  | \nA book is a gift you can open again and \" again.|Garrison Keillor||U\n",
        );

        let err = read_quotes(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "syntax error on line 2 of {}: the quote included a (\") character.  \
                 Line with error: \"A book is a gift you can open again and \" again.|Garrison Keillor||U\"",
                path.display()
            )
        );
    }

    #[test]
    fn test_read_quotes_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(
            &temp_dir,
            "quotes8.txt",
            "A | One |  | \nB | Two |  | \nA | Three |  | \n",
        );

        let err = read_quotes(&path).unwrap_err();
        match err {
            QuoteError::Duplicate { line, ref text, .. } => {
                assert_eq!(line, 3);
                assert_eq!(text, "A");
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            format!(
                "a duplicate quote was found on line 3 of '{}'.  Quote: \"A\".",
                path.display()
            )
        );
    }

    #[test]
    fn test_check_for_duplicates() {
        let quotes = vec![
            Quote::new("This is an added quote.", "Another author", None, Vec::new()).unwrap(),
            Quote::new("This is an added quote.", "Another author2", None, Vec::new()).unwrap(),
            Quote::new("This is an added quote.", "Another author3", None, Vec::new()).unwrap(),
        ];

        let err = check_for_duplicates(&quotes, "stdin").unwrap_err();
        assert_eq!(
            err.to_string(),
            "a duplicate quote was found on line 2 of 'stdin'.  Quote: \"This is an added quote.\"."
        );

        check_for_duplicates(&quotes[..1], "stdin").unwrap();
    }

    #[test]
    fn test_write_quotes_unix() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let quotes = read_quotes(&path).unwrap();

        write_quotes(&path, &quotes, &unix_config()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), QUOTES1);
        assert!(temp_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_write_quotes_windows() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let quotes = read_quotes(&path).unwrap();
        let config = Config {
            line_separator: Some("windows".to_string()),
            ..Config::default()
        };

        write_quotes(&path, &quotes, &config).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, QUOTES1.replace('\n', "\r\n").into_bytes());
    }

    #[test]
    fn test_write_quotes_invalid_separator_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let quotes = read_quotes(&path).unwrap();
        let config = Config {
            line_separator: Some("VAX-VMS".to_string()),
            ..Config::default()
        };

        let err = write_quotes(&path, &quotes, &config).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidLineSeparator(_)));
        assert!(!backup_path(&path).exists());
        assert!(temp_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_write_quotes_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fakename.txt");
        let quotes = vec![Quote::new("Another new quote", "author", None, Vec::new()).unwrap()];

        let err = write_quotes(&path, &quotes, &unix_config()).unwrap_err();
        assert!(matches!(err, QuoteError::NotFound { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes.txt", "");
        let quotes = vec![
            Quote::new("One", "Author", Some("Pub"), vec!["b".into(), "a".into()]).unwrap(),
            Quote::new("δηψ.", "Greek Author", None, Vec::new()).unwrap(),
        ];

        write_quotes(&path, &quotes, &unix_config()).unwrap();
        assert_eq!(read_quotes(&path).unwrap(), quotes);
    }

    #[test]
    fn test_write_creates_backup_of_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let mut quotes = read_quotes(&path).unwrap();
        quotes.push(Quote::new("Another new quote", "author", None, Vec::new()).unwrap());

        write_quotes(&path, &quotes, &unix_config()).unwrap();

        let backup = temp_dir.path().join(".quotes1.txt.jotquote.bak");
        assert_eq!(backup_path(&path), backup);
        assert_eq!(fs::read_to_string(&backup).unwrap(), QUOTES1);
        assert_eq!(read_quotes(&path).unwrap().len(), 5);
    }

    #[test]
    fn test_write_replaces_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let quotes = read_quotes(&path).unwrap();
        let mut more = quotes.clone();
        more.push(Quote::new("Another new quote", "author", None, Vec::new()).unwrap());

        write_quotes(&path, &more, &unix_config()).unwrap();
        write_quotes(&path, &more, &unix_config()).unwrap();

        let backup_quotes = read_quotes(&backup_path(&path)).unwrap();
        assert_eq!(backup_quotes, more);
    }

    #[test]
    fn test_write_failure_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes1.txt", QUOTES1);
        let before = fs::read(&path).unwrap();

        let err = replace_file(&path, |out| {
            out.write_all(b"bad contents")?;
            Err(io::Error::new(io::ErrorKind::Other, "Fake write error"))
        })
        .unwrap_err();

        assert!(matches!(err, QuoteError::WriteFailed { .. }));
        assert_eq!(
            err.to_string(),
            format!(
                "an error occurred writing the quotes.  The file '{}' was not modified.",
                path.display()
            )
        );
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!backup_path(&path).exists());
        assert!(temp_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_backup_larger_than_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = init_quotefile(&temp_dir, "quotes5.txt", QUOTES5);
        let backup = init_quotefile(&temp_dir, ".quotes5.txt.jotquote.bak", QUOTES1);
        let quotes = read_quotes(&path).unwrap();

        let err = write_quotes(&path, &quotes, &unix_config()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "the backup file '.quotes5.txt.jotquote.bak' is larger than the quote file \
             'quotes5.txt' would be after this operation.  This is suspicious, the quote file \
             was not modified.  If this was expected, delete the backup file and try again."
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), QUOTES5);
        assert_eq!(fs::read_to_string(&backup).unwrap(), QUOTES1);
        assert!(temp_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_available_temp_path() {
        let temp_dir = TempDir::new().unwrap();
        let temp = available_temp_path(temp_dir.path(), "quotes.txt");

        assert_eq!(temp.parent().unwrap(), temp_dir.path());
        let name = file_name_of(&temp);
        assert!(name.starts_with(".quotes.txt"));
        assert!(name.ends_with(".jotquote.tmp"));
        assert!(!temp.exists());
    }

    #[test]
    fn test_temp_path_skips_existing_names() {
        let temp_dir = TempDir::new().unwrap();
        init_quotefile(&temp_dir, ".quotes.txt1.jotquote.tmp", "");
        init_quotefile(&temp_dir, ".quotes.txt2.jotquote.tmp", "");

        let mut suffixes = [1, 2, 3].into_iter();
        let temp = first_free_temp_path(temp_dir.path(), "quotes.txt", || {
            suffixes.next().unwrap()
        });

        assert_eq!(temp, temp_dir.path().join(".quotes.txt3.jotquote.tmp"));
        assert_eq!(suffixes.next(), None);
    }
}
