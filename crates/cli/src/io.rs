use anyhow::{bail, Context, Result};
use fvs::Point2;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a points file: one `x y` pair per line, whitespace-separated.
/// Blank lines are skipped; anything else malformed is an error.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point2<f64>>> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_points(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_points(text: &str) -> Result<Vec<Point2<f64>>> {
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let (x, y) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(x), Some(y), None) => (x, y),
            _ => bail!("line {}: expected `x y`, got {line:?}", lineno + 1),
        };
        let x: f64 = x
            .parse()
            .with_context(|| format!("line {}: bad x coordinate {x:?}", lineno + 1))?;
        let y: f64 = y
            .parse()
            .with_context(|| format!("line {}: bad y coordinate {y:?}", lineno + 1))?;
        points.push(Point2::new(x, y));
    }
    Ok(points)
}

/// Write points in the same `x y` format, creating parent directories.
pub fn write_points<P: AsRef<Path>>(path: P, points: &[Point2<f64>]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    let mut out = Vec::with_capacity(points.len() * 12);
    for p in points {
        writeln!(out, "{} {}", p.x, p.y)?;
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_skips_blank_lines() {
        let pts = parse_points("1 2\n\n  3.5\t-4\n").unwrap();
        assert_eq!(pts, vec![Point2::new(1.0, 2.0), Point2::new(3.5, -4.0)]);
    }

    #[test]
    fn parse_reports_line_numbers() {
        let err = parse_points("1 2\n3\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        let err = parse_points("1 2\n3 x\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_points("1 2 3\n").is_err());
    }

    #[test]
    fn write_then_read_integer_coordinates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/input.points");
        let pts = vec![Point2::new(700.0, 450.0), Point2::new(12.0, 0.0)];
        write_points(&path, &pts).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "700 450\n12 0\n");
        assert_eq!(read_points(&path).unwrap(), pts);
    }
}
