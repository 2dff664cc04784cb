//! Report rendering.
//!
//! Every writer walks the same `ReportModel` sections; none of them
//! recompute or reorder anything. JSON keeps full precision for machine
//! consumers, markdown mirrors the printable worksheet, and the terminal
//! writer adds color and a safe-range callout for interactive use.

use std::io::Write;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell as TableCell, CellAlignment, Table};

use crate::report::{ReportModel, ReportSection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, model: &ReportModel) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, model: &ReportModel) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(model)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, model: &ReportModel) -> anyhow::Result<()> {
        writeln!(self.writer, "# ROI Worksheet")?;
        writeln!(self.writer)?;
        if let Some(contact) = &model.contact {
            writeln!(
                self.writer,
                "Prepared for: {} ({})",
                contact.company_name, contact.full_name
            )?;
        }
        writeln!(
            self.writer,
            "Generated: {}",
            model.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_section(&mut self, section: &ReportSection) -> anyhow::Result<()> {
        writeln!(self.writer, "## {}", section.title)?;
        writeln!(self.writer)?;

        write!(self.writer, "| |")?;
        for column in &section.columns {
            write!(self.writer, " {} |", column)?;
        }
        writeln!(self.writer)?;

        write!(self.writer, "|---|")?;
        for _ in &section.columns {
            write!(self.writer, "---|")?;
        }
        writeln!(self.writer)?;

        for row in &section.rows {
            let label = if row.emphasis {
                format!("**{}**", row.label)
            } else {
                row.label.clone()
            };
            write!(self.writer, "| {} |", label)?;
            for cell in &row.cells {
                let rendered = cell.render();
                if row.emphasis && !rendered.is_empty() {
                    write!(self.writer, " **{}** |", rendered)?;
                } else {
                    write!(self.writer, " {} |", rendered)?;
                }
            }
            writeln!(self.writer)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_review_note(&mut self, model: &ReportModel) -> anyhow::Result<()> {
        let c = &model.classification;
        if !c.is_safe {
            writeln!(
                self.writer,
                "> **Manual review required**: annual ROI {:.1}% falls outside the \
                 safe range [{}%, {}%].",
                c.annual_roi, c.lower_bound, c.upper_bound
            )?;
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, model: &ReportModel) -> anyhow::Result<()> {
        self.write_header(model)?;
        for section in &model.sections {
            self.write_section(section)?;
        }
        self.write_review_note(model)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn section_table(section: &ReportSection) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![TableCell::new(&section.title)];
        for column in &section.columns {
            header.push(TableCell::new(column).set_alignment(CellAlignment::Right));
        }
        table.set_header(header);

        for row in &section.rows {
            let mut cells = vec![TableCell::new(&row.label)];
            for cell in &row.cells {
                cells.push(TableCell::new(cell.render()).set_alignment(CellAlignment::Right));
            }
            table.add_row(cells);
        }
        table
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, model: &ReportModel) -> anyhow::Result<()> {
        if let Some(contact) = &model.contact {
            writeln!(
                self.writer,
                "{}",
                format!("ROI Worksheet: {}", contact.company_name).bold()
            )?;
        } else {
            writeln!(self.writer, "{}", "ROI Worksheet".bold())?;
        }
        writeln!(self.writer)?;

        for section in &model.sections {
            writeln!(self.writer, "{}", Self::section_table(section))?;
            writeln!(self.writer)?;
        }

        let c = &model.classification;
        if c.is_safe {
            writeln!(
                self.writer,
                "{} annual ROI {:.1}% within safe range [{}%, {}%]",
                "✓".green().bold(),
                c.annual_roi,
                c.lower_bound,
                c.upper_bound
            )?;
        } else {
            writeln!(
                self.writer,
                "{} annual ROI {:.1}% outside safe range [{}%, {}%], flagged for manual review",
                "⚠".yellow().bold(),
                c.annual_roi,
                c.lower_bound,
                c.upper_bound
            )?;
        }
        Ok(())
    }
}
