// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTML rendering of the dashboard page.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::dashboard::{RefreshFailure, Snapshot};
use crate::normalize::{ChartSplit, Measure, NodeView, PodView};
use crate::theme::Theme;

pub struct Page<'a> {
    pub namespace: &'a str,
    pub snapshot: Option<&'a Snapshot>,
    pub last_error: Option<&'a RefreshFailure>,
    pub theme: Theme,
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 1rem 2rem; }
body.dark { background: #020617; color: #e2e8f0; }
body.light { background: #f8fafc; color: #0f172a; }
header { display: flex; gap: 1.25rem; align-items: center; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2rem; }
th, td { text-align: left; padding: .35rem .75rem; border-bottom: 1px solid #64748b; }
.error { color: #f87171; }
.charts { display: flex; flex-wrap: wrap; gap: 1.5rem; margin-bottom: 2rem; }
figure { margin: 0; text-align: center; }
.used { fill: #2563eb; }
.remaining { fill: #94a3b8; }
.empty { fill: none; stroke: #64748b; }
";

pub fn render_dashboard(page: &Page<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let toggle_label = match page.theme {
        Theme::Dark => "Light mode",
        Theme::Light => "Dark mode",
    };

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Kubernetes Metrics</title>\n<style>{STYLE}</style>\n</head>\n\
         <body class=\"{theme}\">\n<header>\n<h1>Kubernetes Metrics</h1>\n\
         <form method=\"post\" action=\"/refresh\"><button type=\"submit\">Refresh</button></form>\n\
         <form method=\"post\" action=\"/theme/toggle\"><button type=\"submit\">{toggle_label}</button></form>\n\
         </header>\n",
        theme = page.theme,
    );

    if let Some(failure) = page.last_error {
        let _ = writeln!(
            html,
            "<p class=\"error\">Last refresh failed at {}: {}</p>",
            failure.failed_at.to_rfc3339(),
            escape(&failure.message)
        );
    }

    match page.snapshot {
        Some(snapshot) => {
            let _ = writeln!(
                html,
                "<p>Refresh #{} at {}</p>",
                snapshot.generation,
                snapshot.fetched_at.to_rfc3339()
            );
            render_nodes(&mut html, &snapshot.nodes);
            render_pods(&mut html, page.namespace, &snapshot.pods);
        }
        None => html.push_str("<p>No metrics loaded yet.</p>\n"),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_nodes(html: &mut String, nodes: &[NodeView]) {
    html.push_str(
        "<h2>Node Metrics</h2>\n<table>\n<thead><tr><th>Node Name</th><th>CPU Usage</th>\
         <th>CPU Capacity</th><th>CPU %</th><th>Memory Usage</th><th>Memory Capacity</th>\
         <th>Memory %</th></tr></thead>\n<tbody>\n",
    );
    for node in nodes {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}m</td><td>{}</td><td>{}</td><td>{}Mi</td><td>{}</td><td>{}</td></tr>",
            escape(&node.name),
            node.cpu_usage_milli,
            with_unit(node.cpu_capacity_milli, "m"),
            node.cpu_percent,
            node.memory_usage_mebi,
            with_unit(node.memory_capacity_mebi, "Mi"),
            node.memory_percent,
        );
    }
    html.push_str("</tbody>\n</table>\n<div class=\"charts\">\n");

    for node in nodes {
        let name = escape(&node.name);
        html.push_str(&pie(&format!("{name} CPU"), node.cpu_chart()));
        html.push_str(&pie(&format!("{name} Memory"), node.memory_chart()));
    }
    html.push_str("</div>\n");
}

fn render_pods(html: &mut String, namespace: &str, pods: &[PodView]) {
    let _ = write!(
        html,
        "<h2>Pod Metrics ({})</h2>\n<table>\n<thead><tr><th>Pod Name</th><th>Namespace</th>\
         <th>CPU Usage</th><th>Memory Usage</th></tr></thead>\n<tbody>\n",
        escape(namespace)
    );
    for pod in pods {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&pod.name),
            escape(&pod.namespace),
            with_unit(pod.cpu_usage_milli, "m"),
            with_unit(pod.memory_usage_mebi, "Mi"),
        );
    }
    html.push_str("</tbody>\n</table>\n");
}

fn with_unit(value: Measure<u64>, unit: &str) -> String {
    match value {
        Measure::Available(v) => format!("{v}{unit}"),
        Measure::Unavailable => value.to_string(),
    }
}

const RADIUS: f64 = 50.0;
const CENTER: f64 = 60.0;

/// Two-slice SVG pie, used slice drawn clockwise from 12 o'clock.
///
/// `title` must already be escaped.
pub fn pie(title: &str, split: ChartSplit) -> String {
    let total = split.total();
    let body = if total == 0 {
        format!("<circle class=\"empty\" cx=\"{CENTER}\" cy=\"{CENTER}\" r=\"{RADIUS}\"/>")
    } else if split.remaining == 0 || split.used == 0 {
        let class = if split.used == 0 { "remaining" } else { "used" };
        format!("<circle class=\"{class}\" cx=\"{CENTER}\" cy=\"{CENTER}\" r=\"{RADIUS}\"/>")
    } else {
        let angle = split.used as f64 / total as f64 * 2.0 * PI;
        let x = CENTER + RADIUS * angle.sin();
        let y = CENTER - RADIUS * angle.cos();
        let large_arc = u8::from(angle > PI);
        format!(
            "<circle class=\"remaining\" cx=\"{CENTER}\" cy=\"{CENTER}\" r=\"{RADIUS}\"/>\
             <path class=\"used\" d=\"M {CENTER} {CENTER} L {CENTER} {top} \
             A {RADIUS} {RADIUS} 0 {large_arc} 1 {x:.2} {y:.2} Z\"/>",
            top = CENTER - RADIUS,
        )
    };

    format!(
        "<figure><svg width=\"120\" height=\"120\" viewBox=\"0 0 120 120\" role=\"img\">\
         <title>{title}: {used} used, {remaining} remaining</title>{body}</svg>\
         <figcaption>{title}</figcaption></figure>\n",
        used = split.used,
        remaining = split.remaining,
    )
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
