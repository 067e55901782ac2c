use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::core::{Currency, Result};
use crate::modules::reports::models::CutReport;

const SHEET_NAME: &str = "Corte";

const EMPLOYEE_HEADERS: [&str; 6] = [
    "Nombre completo",
    "Total ganado",
    "Préstamos netos",
    "A pagar",
    "Préstamo abonado",
    "¿Abono automático aplicado?",
];

const PRODUCT_HEADERS: [&str; 3] = ["Producto", "Cantidad vendida", "Total ganado"];

const MIN_COLUMN_WIDTH: usize = 10;
const COLUMN_PADDING: usize = 2;

/// One sheet cell before it is written
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Header(String),
    Text(String),
    Number(i64),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Header(s) | Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().len(),
        }
    }
}

fn header_row(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|h| Cell::Header(h.to_string())).collect()
}

/// Lay the report out as rows: employee table, two blank rows, product table
fn layout(report: &CutReport, currency: Currency) -> Vec<Vec<Cell>> {
    let money = |amount| Cell::Text(currency.format_amount(amount));

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    rows.push(header_row(&EMPLOYEE_HEADERS));
    for employee in &report.employees {
        rows.push(vec![
            Cell::Text(employee.full_name.clone()),
            money(employee.total_earned),
            money(employee.net_loan_balance),
            money(employee.payable),
            money(employee.deducted),
            Cell::Text(employee.settlement.label().to_string()),
        ]);
    }

    rows.push(Vec::new());
    rows.push(Vec::new());

    rows.push(header_row(&PRODUCT_HEADERS));
    for product in &report.products {
        rows.push(vec![
            Cell::Text(product.name.clone()),
            Cell::Number(product.quantity),
            money(product.revenue),
        ]);
    }

    rows
}

/// Width per column: longest cell (at least 10 characters) plus padding
fn column_widths(rows: &[Vec<Cell>]) -> Vec<usize> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(Cell::display_len)
                .fold(MIN_COLUMN_WIDTH, usize::max)
                + COLUMN_PADDING
        })
        .collect()
}

/// Render the cut as an `.xlsx` document
pub fn render_workbook(report: &CutReport, currency: Currency) -> Result<Vec<u8>> {
    let rows = layout(report, currency);
    let widths = column_widths(&rows);

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFDE68A))
        .set_background_color(Color::RGB(0xBE185D))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                Cell::Header(text) => {
                    sheet.write_string_with_format(row_num, col_num, text, &header_format)?;
                }
                Cell::Text(text) => {
                    sheet.write_string_with_format(row_num, col_num, text, &body_format)?;
                }
                Cell::Number(n) => {
                    sheet.write_number_with_format(row_num, col_num, *n as f64, &body_format)?;
                }
            }
        }
    }

    for (col_idx, width) in widths.iter().enumerate() {
        sheet.set_column_width(col_idx as u16, *width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}
