use std::io::Write;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Result};
use tempfile::Builder;

const HEADER: &str = "Sr_no,Coll_Date,Ne_date,Ses_code,Coll_time,Mem_code,Category,Volume_lt,Fat_per,Clr,Snf,Protien,Kg_fat,Kg_snf,Rate,Kg_rate,Snf_rate,Ts_comm,Amount,Remark";

fn run_cli(args: &[&str]) -> Result<(bool, String, String)> {
    let binary_path = env!("CARGO_BIN_EXE_milk-ingest");
    let output = Command::new(binary_path).args(args).output()?;

    Ok((
        output.status.success(),
        String::from_utf8(output.stdout)?,
        String::from_utf8(output.stderr)?
    ))
}

fn sample(name: &str) -> Result<String> {
    Path::new("samples").join(name)
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("sample path is not valid UTF-8"))
}

#[test]
fn test_cli_writes_every_csv_record_with_normalized_member_codes() -> Result<()> {
    let (success, stdout, stderr) = run_cli(&[&sample("collection.csv")?])?;

    assert!(success);

    let mut lines = stdout.lines();

    assert_eq!(lines.next(), Some(HEADER));

    let rows: Vec<Vec<String>> = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(stdout.as_bytes())
        .records()
        .map(|record| record.map(|record| record.iter().map(str::to_string).collect()))
        .collect::<Result<_, _>>()?;

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.len() == 20));
    assert_eq!(rows[0][5], "3");
    assert_eq!(rows[1][19], "Kathmandu, Nepal");
    assert_eq!(rows[2][5], "0");
    assert!(stderr.contains("total=4 filtered=4 unique_dates=2"));

    Ok(())
}

#[test]
fn test_cli_filters_csv_by_collection_date() -> Result<()> {
    let (success, stdout, stderr) = run_cli(&[&sample("collection.csv")?, "--date", "14/07/2082"])?;

    assert!(success);
    assert_eq!(stdout.lines().skip(1).count(), 3);
    assert!(stdout.lines().skip(1).all(|line| line.contains("14/07/2082")));
    assert!(stderr.contains("total=4 filtered=3 unique_dates=2 range=14/07/2082..15/07/2082"));

    Ok(())
}

#[test]
fn test_cli_reads_dbf_and_skips_deleted_records() -> Result<()> {
    let (success, stdout, stderr) = run_cli(&[&sample("collection.dbf")?, "--date", "14/07/2082"])?;

    assert!(success);

    let serials: Vec<&str> = stdout.lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .collect();

    assert_eq!(serials, vec!["1", "3"]);
    assert!(stdout.contains("31/10/2025"));
    assert!(stdout.contains(",12.5,"));
    assert!(stderr.contains("total=3 filtered=2 unique_dates=2"));

    Ok(())
}

#[test]
fn test_cli_keeps_member_codes_when_asked() -> Result<()> {
    let (success, stdout, _) = run_cli(&[&sample("collection.dbf")?, "--no-normalize"])?;

    assert!(success);
    assert!(stdout.lines().nth(1).is_some_and(|line| line.contains(",0003,")));

    Ok(())
}

#[test]
fn test_cli_stats_only_prints_no_records() -> Result<()> {
    let (success, stdout, stderr) = run_cli(&[&sample("collection.csv")?, "--stats-only"])?;

    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("filtered=4"));

    Ok(())
}

#[test]
fn test_cli_rejects_unsupported_and_empty_files() -> Result<()> {
    let mut text_file = Builder::new().suffix(".txt").tempfile()?;
    writeln!(text_file, "not a collection export")?;

    let empty_csv = Builder::new().suffix(".csv").tempfile()?;

    let text_path = text_file.path().to_str().ok_or_else(|| anyhow!("temp path is not valid UTF-8"))?;
    let empty_path = empty_csv.path().to_str().ok_or_else(|| anyhow!("temp path is not valid UTF-8"))?;

    let (success, _, stderr) = run_cli(&[text_path])?;

    assert!(!success);
    assert!(stderr.contains("Unsupported file format"));

    let (success, _, stderr) = run_cli(&[empty_path])?;

    assert!(!success);
    assert!(stderr.contains("File is empty"));

    Ok(())
}
