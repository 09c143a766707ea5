pub mod blend;
pub mod compare;
pub mod diagnose;
pub mod waxes;

use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `report` as pretty JSON to `output`, or to stdout when no path is given.
pub fn write_report<T: Serialize + ?Sized>(report: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            info!("Report written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, report)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const CSV_HEADER: &str =
        "id,name,family,molecular_weight,flash_point,boiling_point,logp,odor_threshold,volatility";

    /// Writes a small molecule database and a two-component fragrance into `dir`.
    pub fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let molecules = dir.join("molecules.csv");
        fs::write(
            &molecules,
            format!(
                "{CSV_HEADER}\n\
                 78-70-6,Linalool,terpene-alcohol,154.25,76,,2.97,,high\n\
                 1222-05-5,Galaxolide,musk-polycyclic,258.4,135,,5.9,0.9,very_low\n"
            ),
        )
        .unwrap();

        let fragrance = dir.join("fragrance.toml");
        fs::write(
            &fragrance,
            r#"
            name = "Clean musk"

            [[components]]
            molecule-id = "78-70-6"
            percentage-min = 20
            percentage-max = 30

            [[components]]
            molecule-id = "1222-05-5"
            percentage-min = 10
            percentage-max = 20
            "#,
        )
        .unwrap();

        (fragrance, molecules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Sample {
        wax: &'static str,
        score: i32,
    }

    #[test]
    fn report_is_written_as_json_to_the_given_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&Sample { wax: "soy", score: 6 }, Some(&path)).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["wax"], "soy");
        assert_eq!(value["score"], 6);
    }

    #[test]
    fn unwritable_output_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = write_report(
            &Sample { wax: "soy", score: 6 },
            Some(&dir.path().join("missing/report.json")),
        );
        assert!(matches!(result, Err(crate::error::CliError::Io(_))));
    }
}
