use std::io::{BufRead, BufReader};
use std::{fs, io};

pub(crate) fn file_to_vec(filename: &str) -> io::Result<Vec<String>> {
    let file_in = fs::File::open(filename)?;
    let file_reader = BufReader::new(file_in);
    Ok(file_reader.lines().filter_map(io::Result::ok).collect())
}

pub(crate) fn human_bytes(size: f64) -> String {
    let units = ["B", "KiB", "MiB", "GiB"];
    let mut size = size;
    let mut unit = 0;
    while size >= 1024.0 && unit < units.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, units[unit])
}
