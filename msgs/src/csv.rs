use anyhow::bail;

use crate::box_data::{BoxId, BoxState, Position, DEPTH, HEIGHT, WIDTH};

/// Builds the download format: UTF-8 with BOM, every field double-quoted,
/// header row carrying the column names and the warehouse dimensions.
pub fn export(states: &[BoxState]) -> String {
    let dims = [WIDTH.to_string(), DEPTH.to_string(), HEIGHT.to_string()];
    let header = [
        "box_id",
        "x",
        "y",
        "z",
        dims[0].as_str(),
        dims[1].as_str(),
        dims[2].as_str(),
    ]
    .map(quote)
    .join(",");

    let mut lines = vec![header];
    for (box_id, x, y, z) in states {
        let row = [
            box_id.to_string(),
            x.to_string(),
            y.to_string(),
            z.to_string(),
        ]
        .map(|field| quote(&field))
        .join(",");
        lines.push(row);
    }

    format!("\u{feff}{}", lines.join("\n"))
}

/// Parses an upload. The first row is skipped as the header; every other
/// row needs at least four integer fields. Fields may carry one pair of
/// surrounding double quotes so an exported file loads back in.
pub fn parse(contents: &str) -> anyhow::Result<Vec<(BoxId, Position)>> {
    let contents = contents.trim_start_matches('\u{feff}');

    let mut rows = Vec::new();
    for line in contents.trim().lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 4 {
            bail!("Invalid CSV file format!");
        }

        let mut numbers = [0i32; 4];
        for (number, field) in numbers.iter_mut().zip(&fields) {
            match unquote(field.trim()).parse::<i32>() {
                Ok(value) => *number = value,
                Err(_) => bail!("Invalid CSV file format!"),
            }
        }

        let [box_id, x, y, z] = numbers;
        rows.push((box_id, Position::new(x, y, z)));
    }

    Ok(rows)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
}
