use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::timezone::BusinessClock;
use crate::modules::sales::models::{EmployeeSalesSummary, SaleItem, SaleRecord, SaleWithItems};
use crate::modules::sales::services::date_window::DateWindow;
use crate::modules::users::models::User;

/// Group sale records per employee over a date window
///
/// Returns one entry per user (after the optional `employee_id` narrowing),
/// in the order `users` is given, even when that user sold nothing.
pub fn summarize_sales(
    users: &[User],
    records: Vec<SaleRecord>,
    items: Vec<SaleItem>,
    window: &DateWindow,
    clock: &BusinessClock,
    employee_id: Option<Uuid>,
) -> Vec<EmployeeSalesSummary> {
    let selected = users
        .iter()
        .filter(|u| employee_id.map_or(true, |id| u.id == id));

    let mut items_by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
    for item in items {
        items_by_sale.entry(item.sale_id).or_default().push(item);
    }

    let mut sales_by_employee: HashMap<Uuid, Vec<SaleWithItems>> = HashMap::new();
    for record in records
        .into_iter()
        .filter(|r| employee_id.map_or(true, |id| r.employee_id == id))
        .filter(|r| window.contains(r.sale_date, clock))
    {
        let items = items_by_sale.remove(&record.id).unwrap_or_default();
        sales_by_employee
            .entry(record.employee_id)
            .or_default()
            .push(SaleWithItems { record, items });
    }

    selected
        .map(|user| {
            let sales = sales_by_employee.remove(&user.id).unwrap_or_default();
            let total: Decimal = sales.iter().map(|s| s.record.total_amount).sum();
            let earned: Decimal = sales.iter().map(|s| s.record.earnings_amount).sum();

            EmployeeSalesSummary {
                employee_id: user.id,
                name: user.full_name(),
                total,
                earned,
                sales_records: sales,
            }
        })
        .collect()
}
