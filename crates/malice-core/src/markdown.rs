//! Markdown rendering of scan results, printed by `--table`.

use crate::models::ScanResult;

/// Render a result as the plugin's markdown table.
pub fn render_table(result: &ScanResult) -> String {
    let mut out = String::from("#### ClamAV\n");

    if result.has_error() {
        out.push_str(&format!(" - error: {}\n", escape_cell(&result.error)));
        return out;
    }

    out.push_str("| Infected | Result | Engine | Updated |\n");
    out.push_str("|:--------:|--------|--------|---------|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        result.infected,
        escape_cell(&result.result_label),
        escape_cell(&result.engine_version),
        escape_cell(&result.last_updated),
    ));
    out
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_infected_row() {
        let result = ScanResult {
            infected: true,
            result_label: "Eicar-Test-Signature".to_string(),
            engine_version: "0.103.8".to_string(),
            last_updated: "20240101".to_string(),
            ..ScanResult::default()
        };
        let table = render_table(&result);
        assert!(table.starts_with("#### ClamAV\n"));
        assert!(table.contains("| true | Eicar-Test-Signature | 0.103.8 | 20240101 |"));
    }

    #[test]
    fn renders_error_instead_of_table() {
        let table = render_table(&ScanResult::from_error("command clamscan timed out"));
        assert!(table.contains("error: command clamscan timed out"));
        assert!(!table.contains("| Infected |"));
    }

    #[test]
    fn pipes_in_values_are_escaped() {
        let result = ScanResult {
            result_label: "a|b".to_string(),
            ..ScanResult::default()
        };
        assert!(render_table(&result).contains("a\\|b"));
    }
}
