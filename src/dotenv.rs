use dictionary::{Dict, Value};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::env::current_dir;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const VAR_PREFIX: &str = "DICT_VAR_";
const ENTRY_PREFIX: &str = "DICT_VAR_ENTRY_";

#[derive(Debug, PartialEq)]
enum DotEnvFileType {
    Entries,
    DotEnv,
}

pub struct DotEnvInjector {
    file_path: PathBuf,
}

impl DotEnvInjector {
    pub fn new(file_path: Option<PathBuf>) -> Self {
        let file_path = match file_path {
            Some(path) => path,
            None => current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf()),
        };
        Self { file_path }
    }

    /// Fill `entries` with dotenv values for keys it does not hold yet.
    /// Command-line entries win over `.env`, which wins over `.env.dict`.
    pub fn merge_into(&self, entries: &mut Dict) -> std::io::Result<()> {
        for (key, value) in self.read_dotenv_file(DotEnvFileType::DotEnv)? {
            if let Some(key) = filter_named_key(&key) {
                entries.set_default(key, parse_value(&value));
            }
        }

        for (key, value) in self.read_dotenv_file(DotEnvFileType::Entries)? {
            if !key.starts_with(VAR_PREFIX) {
                entries.set_default(key, parse_value(&value));
            }
        }

        debug!(path = ?self.file_path, count = entries.len(), "dotenv merged");
        Ok(())
    }

    fn read_dotenv_file(
        &self,
        file_type: DotEnvFileType,
    ) -> std::io::Result<HashMap<SmolStr, SmolStr>> {
        let file_name = match file_type {
            DotEnvFileType::Entries => ".env.dict",
            DotEnvFileType::DotEnv => ".env",
        };

        let filename = self.file_path.join(file_name);
        let lines = match fs::read_to_string(&filename) {
            Ok(lines) => lines,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                trace!(?filename, "dotenv file not found");
                return Ok(HashMap::new());
            }
            Err(error) => return Err(error),
        };

        let mut variables = HashMap::new();
        for raw in lines.lines() {
            let line = match raw.split_once('#') {
                Some((line, _)) => line,
                None => raw,
            };
            if line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                variables.insert(SmolStr::new(key.trim()), SmolStr::new(value.trim()));
            }
        }
        Ok(variables)
    }
}

/// Prefixed keys are only accepted in `.env` with the entry prefix, which is
/// stripped. Other `DICT_VAR_` keys belong to other consumers.
fn filter_named_key(key: &str) -> Option<SmolStr> {
    if let Some(stripped) = key.strip_prefix(ENTRY_PREFIX) {
        Some(SmolStr::new(stripped))
    } else if key.starts_with(VAR_PREFIX) {
        None
    } else {
        Some(SmolStr::new(key))
    }
}

fn parse_value(text: &str) -> Value {
    match text.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod dotenv_injector_tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn dict(pairs: &[(&str, Value)]) -> Dict {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_read_dotenv_file() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            "\
            KEY1=value1
            KEY2=value2
            ",
        )
        .unwrap();

        let injector = DotEnvInjector::new(Some(temp_dir.path().to_path_buf()));
        let result = injector.read_dotenv_file(DotEnvFileType::DotEnv).unwrap();

        let mut expected = HashMap::new();
        expected.insert(SmolStr::new("KEY1"), SmolStr::new("value1"));
        expected.insert(SmolStr::new("KEY2"), SmolStr::new("value2"));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_read_dotenv_file_with_comments_and_errored_lines() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".env.dict"),
            "\
            #first line is rubbish

            KEY3=value3
            This line is not valid
            KEY4 = value4 # This is a comment - ignore it
            ",
        )
        .unwrap();

        let injector = DotEnvInjector::new(Some(temp_dir.path().to_path_buf()));
        let result = injector.read_dotenv_file(DotEnvFileType::Entries).unwrap();

        let mut expected = HashMap::new();
        expected.insert(SmolStr::new("KEY3"), SmolStr::new("value3"));
        expected.insert(SmolStr::new("KEY4"), SmolStr::new("value4"));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_missing_files_merge_nothing() {
        let temp_dir = tempdir().unwrap();
        let injector = DotEnvInjector::new(Some(temp_dir.path().to_path_buf()));

        let mut entries = Dict::new();
        injector.merge_into(&mut entries).unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn test_merge_keeps_command_line_entries() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            "\
            KEY1=1 # This is a comment - ignore it
            KEY2=value2
            # KEY4=value4  This is also a comment
            ",
        )
        .unwrap();

        let injector = DotEnvInjector::new(Some(temp_dir.path().to_path_buf()));
        let mut entries = dict(&[
            ("KEY2", Value::from("override_value2")),
            ("KEY3", Value::from(true)),
        ]);
        injector.merge_into(&mut entries).unwrap();

        let expected = dict(&[
            ("KEY1", Value::Int(1)),
            ("KEY2", Value::from("override_value2")),
            ("KEY3", Value::Bool(true)),
        ]);
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_merge_prefixed_keys() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".env"),
            "\
            KEY1=value1
            DICT_VAR_ENTRY_KEY2=value2
            DICT_VAR_OTHER_KEY6=ignored
            ",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(".env.dict"),
            "\
            KEY1=shadowed
            KEY3=2.5
            DICT_VAR_ENTRY_KEY7=ignored # prefixed keys are only allowed in .env
            ",
        )
        .unwrap();

        let injector = DotEnvInjector::new(Some(temp_dir.path().to_path_buf()));
        let mut entries = Dict::new();
        injector.merge_into(&mut entries).unwrap();

        let expected = dict(&[
            ("KEY1", Value::from("value1")),
            ("KEY2", Value::from("value2")),
            ("KEY3", Value::Float(2.5)),
        ]);
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_filter_named_key() {
        assert_eq!(filter_named_key("PLAIN"), Some(SmolStr::new("PLAIN")));
        assert_eq!(filter_named_key("DICT_VAR_ENTRY_A"), Some(SmolStr::new("A")));
        assert_eq!(filter_named_key("DICT_VAR_SECRET_A"), None);
    }
}
