use std::io::{self, Write};

use crate::config::PackageFilter;
use crate::core::Report;

pub const CSV_HEADER: &str = "package,release";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub package: &'a str,
    pub release: &'a str,
}

/// Releases in lexicographic order, SRUs in document order.
pub fn matching_rows<'a>(report: &'a Report, filter: &PackageFilter) -> Vec<Row<'a>> {
    report
        .iter()
        .flat_map(|(release, srus)| {
            srus.iter()
                .filter(move |sru| filter.matches(&sru.pkg))
                .map(move |sru| Row {
                    package: sru.pkg.as_str(),
                    release: release.as_str(),
                })
        })
        .collect()
}

/// Writes the header and one line per match. Values are not quoted.
pub fn write_csv<W: Write>(
    out: &mut W,
    report: &Report,
    filter: &PackageFilter,
) -> io::Result<usize> {
    let rows = matching_rows(report, filter);
    writeln!(out, "{CSV_HEADER}")?;
    for row in &rows {
        writeln!(out, "{},{}", row.package, row.release)?;
    }
    out.flush()?;
    Ok(rows.len())
}
