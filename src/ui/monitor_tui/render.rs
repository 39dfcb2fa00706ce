use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
};

use super::app::MonitorApp;
use super::widgets::{centered_rect, colored_gauge, level_color, usage_color};
use crate::core::system_monitor::{AlertLevel, SortKey};
use crate::ui::formatters::{
    format_clock, format_latency_ms, format_latency_ns, format_percent, format_size_kb,
    truncate_to_width,
};

const MAX_NAME_WIDTH: usize = 32;
const MAX_MOUNT_WIDTH: usize = 24;

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &MonitorApp) {
    let area = frame.area();
    let show_alert = app.engine.alert_visible();

    let mut constraints = vec![Constraint::Length(3)]; // Header
    if show_alert {
        constraints.push(Constraint::Length(4)); // Alert panel
    }
    constraints.extend([
        Constraint::Length(cpu_height(app)),
        Constraint::Length(6), // Memory
        Constraint::Length(disk_height(app)),
        Constraint::Min(5), // Processes
        Constraint::Length(1), // Status
        Constraint::Length(1), // Footer
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut i = 0;
    let mut next = || {
        let chunk = chunks[i];
        i += 1;
        chunk
    };

    render_header(frame, next(), app);
    if show_alert {
        render_alert_panel(frame, next(), app);
    }
    render_cpu_section(frame, next(), app);
    render_memory_section(frame, next(), app);
    render_disk_section(frame, next(), app);
    render_processes_section(frame, next(), app);
    render_status(frame, next(), app);
    render_footer(frame, next());

    if let Some(process) = &app.pending_kill {
        render_confirm_dialog(frame, area, process.pid, &process.name, process.cpu_percent);
    } else if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn cpu_height(app: &MonitorApp) -> u16 {
    // Total gauge + one line per core, capped
    let cores = app.engine.metrics().cpu.per_core_usage.len().min(8) as u16;
    cores + 3
}

fn disk_height(app: &MonitorApp) -> u16 {
    let disks = app.engine.metrics().disks.len().clamp(1, 6) as u16;
    disks + 3
}

fn render_header(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let metrics = app.engine.metrics();
    let sort = match app.engine.processes().sort_key() {
        SortKey::Cpu => "CPU",
        SortKey::Memory => "Memory",
    };
    let level = app.engine.alert_level();

    let title = format!(
        " Activity Monitor │ {} │ Refresh: {}ms │ Threshold: {:.0}% │ Sort: {} ",
        format_clock(metrics.timestamp),
        app.engine.config().refresh_interval_ms,
        app.engine.threshold(),
        sort
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(level_color(level)));

    frame.render_widget(block, area);
}

fn render_alert_panel(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let level = app.engine.alert_level();
    let usage = app.engine.metrics().cpu.total_usage;
    let threshold = app.engine.threshold();
    let color = level_color(level);

    let (title, headline) = match level {
        AlertLevel::Warning => (
            " ⚠ CPU ALERT ",
            format!("CPU usage {:.1}% exceeds threshold {:.1}%", usage, threshold),
        ),
        _ => (
            " CPU WARNING ",
            format!(
                "CPU usage {:.1}% is approaching threshold {:.1}%",
                usage, threshold
            ),
        ),
    };

    let detail = match app.engine.processes().top_cpu_consumer() {
        Some(p) => format!(
            "Top process: {} (PID {}) at {:.1}% │ press 'k' to terminate",
            p.name, p.pid, p.cpu_percent
        ),
        None => "No specific process identified as the main consumer.".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ])
    .block(block);

    frame.render_widget(text, area);
}

fn render_cpu_section(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let cpu = &app.engine.metrics().cpu;

    let block = Block::default()
        .title(format!(" CPU ({} cores) ", cpu.core_count))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let cores_to_show = (inner.height as usize - 1).min(cpu.per_core_usage.len());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); cores_to_show + 1])
        .split(inner);

    let total_label = if cpu.ready {
        format!("Total [{:>5.1}%]", cpu.total_usage)
    } else {
        "Total [ measuring ]".to_string()
    };
    frame.render_widget(
        colored_gauge(cpu.total_usage as f64, &total_label),
        layout[0],
    );

    for (i, usage) in cpu.per_core_usage.iter().take(cores_to_show).enumerate() {
        let label = format!("C{:02} [{:>5.1}%]", i, usage);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(usage_color(*usage as f64)))
            .label(label)
            .ratio((*usage as f64 / 100.0).clamp(0.0, 1.0));
        frame.render_widget(gauge, layout[i + 1]);
    }
}

fn render_memory_section(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let mem = &app.engine.metrics().memory;

    let block = Block::default().title(" Memory ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // RAM
            Constraint::Length(1), // Cache/Buffers
            Constraint::Length(1), // Swap
            Constraint::Length(1), // Model
        ])
        .split(inner);

    let ram_text = format!(
        "RAM:  {} / {} ({:.1}%)",
        format_size_kb(mem.used_kb),
        format_size_kb(mem.total_kb),
        mem.usage_percent
    );
    frame.render_widget(colored_gauge(mem.usage_percent as f64, &ram_text), layout[0]);

    let cache_text = Paragraph::new(format!(
        "Cached: {} │ Buffers: {} │ Available: {}",
        format_size_kb(mem.cached_kb),
        format_size_kb(mem.buffers_kb),
        format_size_kb(mem.available_kb)
    ))
    .style(Style::default().fg(Color::Blue));
    frame.render_widget(cache_text, layout[1]);

    let swap_text = format!(
        "Swap: {} / {} ({:.1}%)",
        format_size_kb(mem.swap_used_kb),
        format_size_kb(mem.swap_total_kb),
        mem.swap_percent
    );
    frame.render_widget(colored_gauge(mem.swap_percent as f64, &swap_text), layout[2]);

    // Modelled values, not hardware counters
    let model = Paragraph::new(format!(
        "Cache hit rate (est.): {} │ Access latency (est.): {}",
        format_percent(mem.cache_hit_rate),
        format_latency_ns(mem.latency_ns)
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(model, layout[3]);
}

fn render_disk_section(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let disks = &app.engine.metrics().disks;

    let block = Block::default().title(" Disks ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if disks.is_empty() {
        let empty = Paragraph::new("No monitored filesystems")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let header = Row::new(vec!["Mount", "Device", "Type", "Used / Total", "Use%", "Read lat", "I/O ops"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = disks
        .iter()
        .map(|disk| {
            Row::new(vec![
                Cell::from(truncate_to_width(&disk.mount_point, MAX_MOUNT_WIDTH)),
                Cell::from(disk.device.clone()),
                Cell::from(disk.fs_type.clone()),
                Cell::from(format!(
                    "{} / {}",
                    format_size_kb(disk.used_kb),
                    format_size_kb(disk.total_kb)
                )),
                Cell::from(format!("{:.1}%", disk.usage_percent))
                    .style(Style::default().fg(usage_color(disk.usage_percent as f64))),
                Cell::from(format_latency_ms(disk.read_latency_ms)),
                Cell::from(
                    disk.io_operations
                        .map(|ops| ops.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Length(8),
            Constraint::Length(22),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_processes_section(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let registry = app.engine.processes();
    let (cpu_header, mem_header) = match registry.sort_key() {
        SortKey::Cpu => ("CPU % ▼", "MEM %"),
        SortKey::Memory => ("CPU %", "MEM % ▼"),
    };

    let block = Block::default()
        .title(format!(
            " Processes ({}) [{}/{}] ",
            registry.len(),
            (registry.offset() + 1).min(registry.len()),
            registry.len()
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return; // Not enough space for header + at least one row
    }

    let header = Row::new(vec![
        Cell::from("PID").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Name").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(cpu_header).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(mem_header).style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    let visible = inner.height as usize - 1;
    let rows: Vec<Row> = registry
        .entries()
        .iter()
        .skip(registry.offset())
        .take(visible)
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(truncate_to_width(&p.name, MAX_NAME_WIDTH)),
                Cell::from(format!("{:.1}", p.cpu_percent))
                    .style(Style::default().fg(usage_color(p.cpu_percent as f64))),
                Cell::from(format!("{:.1}", p.memory_percent)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_status(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let Some(status) = &app.status else {
        return;
    };
    let color = if status.is_error { Color::Red } else { Color::Green };
    let para = Paragraph::new(format!(" {}", status.text)).style(Style::default().fg(color));
    frame.render_widget(para, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ r: Refresh │ t: Alerts │ c/m: Sort │ k: Kill top │ ↑↓ PgUp/PgDn: Scroll │ ?: Help ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, pid: u32, name: &str, cpu: f32) {
    let text = vec![
        Line::from(""),
        Line::from(format!("Terminate {} (PID {})?", name, pid)),
        Line::from(format!("It is using {:.1}% CPU.", cpu)),
        Line::from(""),
        Line::from(Span::styled(
            "y: terminate   n/Esc: cancel",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center),
        popup_area,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    Activity Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q            Quit the application
    r            Refresh now
    t            Toggle the CPU alert panel
    c / m        Sort processes by CPU / memory
    k            Terminate the highest-CPU process
    ↑ / ↓        Scroll one row
    PgUp / PgDn  Scroll one page
    Home / End   Jump to first / last process
    ?            Toggle this help screen

    Press any shortcut key to close this help
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
