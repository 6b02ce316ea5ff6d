//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::intent::{IntentId, ResourceIntent};
use crate::domain::provision::{ProvisionGraph, RunReport};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::collections::BTreeMap;

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the creation plan in the given order
    pub fn render_plan(&self, graph: &ProvisionGraph, order: &[IntentId]) -> String {
        if graph.is_empty() {
            return "Nothing to provision".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Right),
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("DEPENDS ON").set_alignment(CellAlignment::Left),
                Cell::new("DETAILS").set_alignment(CellAlignment::Left),
            ]);

        for id in order {
            let Some(node) = graph.node(*id) else {
                continue;
            };
            let depends_on = node
                .depends_on
                .and_then(|dep| graph.node(dep))
                .map(|dep| dep.intent.label())
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(node.id.0).set_alignment(CellAlignment::Right),
                Cell::new(node.intent.kind()).fg(self.theme.kind_color(node.intent.kind())),
                Cell::new(node.intent.name()),
                Cell::new(depends_on),
                Cell::new(describe(&node.intent)),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Provisioning Plan {} ─╮\n",
            format!("[{} intents]", graph.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "{} {} roots, {} dependent\n",
            StatusIcon::PENDING,
            graph.roots().count(),
            graph.len() - graph.roots().count()
        ));
        output
    }

    /// Render per-intent outcomes followed by a one-line summary
    pub fn render_run_report(&self, report: &RunReport) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
                Cell::new("IDENTITY / ERROR").set_alignment(CellAlignment::Left),
            ]);

        for intent in &report.intents {
            let color = self.theme.outcome_color(&intent.outcome);
            let detail = intent
                .outcome
                .identity()
                .map(str::to_string)
                .or_else(|| intent.outcome.error_message())
                .unwrap_or_default();

            table.add_row(vec![
                Cell::new(intent.kind).fg(self.theme.kind_color(intent.kind)),
                Cell::new(&intent.name),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::for_outcome(&intent.outcome),
                    StatusIcon::get_status_text(&intent.outcome)
                ))
                .fg(color),
                Cell::new(detail),
            ]);
        }

        let summary = report.summary();
        let overall = if report.is_success() {
            self.theme.success
        } else if summary.succeeded > 0 {
            self.theme.warning
        } else {
            self.theme.error
        };

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Project {} {} ─╮\n",
            report.project_id,
            format!("[{} ms]", report.duration().num_milliseconds()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(
            &format!(
                "{} created, {} failed, {} skipped, {} cancelled",
                summary.succeeded, summary.failed, summary.skipped, summary.cancelled
            )
            .color(table_color_to_colored_str(overall))
            .to_string(),
        );
        output.push('\n');
        output
    }

    /// Render the exported outputs as a two-column table
    pub fn render_outputs(&self, outputs: &BTreeMap<String, String>) -> String {
        if outputs.is_empty() {
            return "No outputs exported".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["OUTPUT", "VALUE"]);

        for (key, value) in outputs {
            table.add_row(vec![Cell::new(key), Cell::new(value).fg(Color::Cyan)]);
        }

        table.to_string()
    }
}

fn describe(intent: &ResourceIntent) -> String {
    match intent {
        ResourceIntent::Bucket(b) => format!("location={}", b.location),
        ResourceIntent::Instance(i) => format!(
            "zone={} machine={} image={} networks={}",
            i.zone,
            i.machine_type,
            i.boot_image,
            i.networks.join(",")
        ),
        ResourceIntent::Cluster(c) => format!(
            "location={} nodes={} remove_default_pool={}",
            c.location, c.initial_node_count, c.remove_default_node_pool
        ),
        ResourceIntent::NodePool(p) => format!(
            "nodes={} machine={} disk={}GB preemptible={}",
            p.node_count,
            p.node_config.machine_type,
            p.node_config.disk_size_gb,
            p.node_config.preemptible
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{parse_config_str, ConfigFormat};
    use crate::domain::intent::ResourceKind;
    use crate::domain::provision::{IntentOutcome, IntentReport};
    use chrono::Utc;

    const CONFIG: &str = r#"
buckets:
  - name: logs
    location: EU
instances: []
clusters:
  - name: c1
    location: europe-west1
    remove_default_node_pool: true
    initial_node_count: 1
    node_pools:
      - preemptible: true
        machine_type: e2-medium
        disk_size_gb: 10
        service_account: sa@example.iam.gserviceaccount.com
"#;

    #[test]
    fn test_render_empty_plan() {
        let renderer = TableRenderer::new();
        let output = renderer.render_plan(&ProvisionGraph::new(), &[]);
        assert!(output.contains("Nothing to provision"));
    }

    #[test]
    fn test_render_plan() {
        let config = parse_config_str(CONFIG, ConfigFormat::Yaml).unwrap();
        let graph = ProvisionGraph::from_config(&config).unwrap();
        let order = graph.topological_order().unwrap();

        let output = TableRenderer::new().render_plan(&graph, &order);
        assert!(output.contains("logs"));
        assert!(output.contains("c1preemptible"));
        assert!(output.contains("cluster/c1"));
        assert!(output.contains("disk=10GB"));
    }

    #[test]
    fn test_render_run_report() {
        let now = Utc::now();
        let report = RunReport {
            project_id: "demo".to_string(),
            started_at: now,
            finished_at: now,
            cancelled: false,
            intents: vec![IntentReport {
                id: IntentId(0),
                kind: ResourceKind::Bucket,
                name: "logs".to_string(),
                outcome: IntentOutcome::Succeeded {
                    identity: "gs://logs".to_string(),
                },
            }],
            outputs: BTreeMap::new(),
        };

        let output = TableRenderer::new().render_run_report(&report);
        assert!(output.contains("gs://logs"));
        assert!(output.contains("Created"));
        assert!(output.contains("1 created, 0 failed"));
    }

    #[test]
    fn test_render_outputs() {
        let renderer = TableRenderer::new();
        assert_eq!(renderer.render_outputs(&BTreeMap::new()), "No outputs exported");

        let mut outputs = BTreeMap::new();
        outputs.insert("bucket_url_logs".to_string(), "gs://logs".to_string());
        let output = renderer.render_outputs(&outputs);
        assert!(output.contains("bucket_url_logs"));
    }
}
