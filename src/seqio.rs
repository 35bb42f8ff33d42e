use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Id and length of one replicon of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepliconSummary {
    /// First token of the FASTA header
    pub id: String,
    /// Number of residues
    pub len: usize,
}

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("gz")).unwrap_or(false)
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path)
        .with_context(|| format!("Failed to open replicon file: {}", path.display()))?;
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

fn summarize_fasta<R: BufRead>(reader: R) -> Result<Vec<RepliconSummary>> {
    let mut replicons: Vec<RepliconSummary> = Vec::new();
    let mut current: Option<RepliconSummary> = None;

    for line_res in reader.lines() {
        let line = line_res?;
        let line = line.trim_end();
        if line.is_empty() { continue; }
        if let Some(header) = line.strip_prefix('>') {
            replicons.extend(current.take());
            let id = header.split_whitespace().next().unwrap_or("").to_string();
            if id.is_empty() {
                return Err(anyhow!("FASTA record {} has an empty header", replicons.len() + 1));
            }
            current = Some(RepliconSummary { id, len: 0 });
        } else {
            let Some(rec) = current.as_mut() else {
                return Err(anyhow!("Not a FASTA file: sequence data found before the first '>' header"));
            };
            rec.len += line.bytes().filter(|b| b.is_ascii_alphabetic()).count();
        }
    }
    replicons.extend(current);
    if replicons.is_empty() {
        return Err(anyhow!("No sequences found in FASTA."));
    }
    Ok(replicons)
}

/// Read the replicon ids and lengths of a FASTA file, optionally gzipped.
pub fn read_replicons<P: AsRef<Path>>(path: P) -> Result<Vec<RepliconSummary>> {
    let path_ref: &Path = path.as_ref();
    let rdr = open_maybe_gz(path_ref)?;
    summarize_fasta(rdr).with_context(|| format!("Failed to read replicons from {}", path_ref.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn summarizes_plain_fasta() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acba.fst");
        let mut f = File::create(&path).unwrap();
        writeln!(f, ">ACBA.007.P01_1 Acinetobacter baumannii").unwrap();
        writeln!(f, "ACGTACGTAC").unwrap();
        writeln!(f, "GTAC").unwrap();
        writeln!(f, ">pl2").unwrap();
        writeln!(f, "acgtn").unwrap();

        let reps = read_replicons(&path).unwrap();
        assert_eq!(
            reps,
            vec![
                RepliconSummary { id: "ACBA.007.P01_1".to_string(), len: 14 },
                RepliconSummary { id: "pl2".to_string(), len: 5 },
            ]
        );
    }

    #[test]
    fn summarizes_gzipped_fasta() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rep.fa.gz");
        let mut gz = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(gz, ">chr\nACGT\nACGT").unwrap();
        gz.finish().unwrap();

        let reps = read_replicons(&path).unwrap();
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].len, 8);
    }

    #[test]
    fn rejects_non_fasta_and_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fq");
        std::fs::write(&path, "@read1\nACGT\n+\nIIII\n").unwrap();
        assert!(read_replicons(&path).is_err());

        let empty = dir.path().join("empty.fa");
        std::fs::write(&empty, "\n").unwrap();
        let err = read_replicons(&empty).unwrap_err();
        assert!(format!("{err:#}").contains("No sequences found"));
    }
}
