use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::forms::DISPLAY_DATE_FORMAT;
use crate::navigation::Route;
use crate::resource_framework::Resource;

/// A typed table cell. Sorting compares by type, rendering formats it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn render(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Integer(value) => value.to_string(),
            Cell::Decimal(value) => format!("{value:.2}"),
            Cell::Date(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
            Cell::Empty => String::new(),
        }
    }

    fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (Cell::Decimal(a), Cell::Decimal(b)) => a.total_cmp(b),
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::Empty, Cell::Empty) => Ordering::Equal,
            // Blank cells sink to the bottom in ascending order.
            (Cell::Empty, _) => Ordering::Greater,
            (_, Cell::Empty) => Ordering::Less,
            (a, b) => a.render().cmp(&b.render()),
        }
    }
}

pub struct Column<T> {
    pub header: &'static str,
    pub accessor: fn(&T) -> Cell,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, accessor: fn(&T) -> Cell) -> Self {
        Self { header, accessor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: usize,
    pub direction: SortDirection,
}

/// One rendered row with its row-level actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
    pub cells: Vec<String>,
    pub edit: Route,
    pub delete: Route,
}

pub struct Table<T: Resource> {
    columns: Vec<Column<T>>,
    data: Vec<T>,
    sort: Option<Sort>,
    page_size: usize,
    page: usize,
}

impl<T: Resource> Table<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            columns: T::columns(),
            data: Vec::new(),
            sort: None,
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.page = 0;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.header).collect()
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Sorts by the column with this header. Returns false if there is none.
    pub fn sort_by(&mut self, header: &str, direction: SortDirection) -> bool {
        match self.columns.iter().position(|column| column.header == header) {
            Some(column) => {
                self.sort = Some(Sort { column, direction });
                self.page = 0;
                true
            }
            None => false,
        }
    }

    /// Ascending on first click, then flips.
    pub fn toggle_sort(&mut self, header: &str) -> bool {
        let direction = match self.sort {
            Some(sort)
                if self.columns.get(sort.column).map(|c| c.header) == Some(header)
                    && sort.direction == SortDirection::Ascending =>
            {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort_by(header, direction)
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.data.len().div_ceil(self.page_size).max(1)
    }

    /// Clamps to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Every row in display order, ignoring pagination.
    pub fn all_rows(&self) -> Vec<Row> {
        self.ordered().into_iter().map(|item| self.row(item)).collect()
    }

    /// Rows of the current page.
    pub fn rows(&self) -> Vec<Row> {
        self.ordered()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|item| self.row(item))
            .collect()
    }

    pub fn render(&self) -> String {
        let headers = self.headers();
        let rows = self.rows();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: Vec<String>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
        out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
        for row in rows {
            out.push(format!("{}  [{}] [{}]", line(row.cells), row.edit, row.delete));
        }
        out.push(format!(
            "Página {} de {} ({} registros)",
            self.page + 1,
            self.page_count(),
            self.data.len()
        ));
        out.join("\n")
    }

    fn ordered(&self) -> Vec<&T> {
        let mut items: Vec<&T> = self.data.iter().collect();
        if let Some(sort) = self.sort {
            let accessor = self.columns[sort.column].accessor;
            // sort_by is stable, so equal keys keep backend order.
            items.sort_by(|a, b| {
                let ordering = accessor(a).compare(&accessor(b));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        items
    }

    fn row(&self, item: &T) -> Row {
        let id = item.id();
        Row {
            id,
            cells: self
                .columns
                .iter()
                .map(|column| (column.accessor)(item).render())
                .collect(),
            edit: Route::Edit(T::KIND, id),
            delete: Route::Delete(T::KIND, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderLine;
    use crate::navigation::ResourceKind;

    fn line(id: i64, product: &str, quantity: u32, price: f64, date: Option<(i32, u32, u32)>) -> OrderLine {
        OrderLine {
            id,
            order_id: 1,
            product_name: product.to_string(),
            quantity,
            price,
            order_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            order_customer: Some("Ana".to_string()),
        }
    }

    fn sample() -> Table<OrderLine> {
        let mut table = Table::new(2);
        table.set_data(vec![
            line(1, "tuerca", 10, 0.5, Some((2024, 3, 1))),
            line(2, "Arandela", 3, 0.1, None),
            line(3, "Perno", 7, 1.25, Some((2023, 12, 24))),
        ]);
        table
    }

    #[test]
    fn rows_expose_actions_for_their_id() {
        let mut table = sample();
        table.set_page_size(10);
        let rows = table.rows();

        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.edit, Route::Edit(ResourceKind::OrderLines, row.id));
            assert_eq!(row.delete, Route::Delete(ResourceKind::OrderLines, row.id));
        }
    }

    #[test]
    fn dates_render_day_first() {
        let table = sample();
        let first = &table.all_rows()[0];
        assert_eq!(first.cells.last().map(String::as_str), Some("01-03-2024"));
        assert_eq!(first.cells[3], "0.50");
    }

    #[test]
    fn sorting_is_type_aware() {
        let mut table = sample();
        assert!(table.sort_by("Cantidad", SortDirection::Ascending));
        let ids: Vec<i64> = table.all_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        assert!(table.sort_by("Nombre del Producto", SortDirection::Descending));
        let ids: Vec<i64> = table.all_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        assert!(!table.sort_by("Inexistente", SortDirection::Ascending));
    }

    #[test]
    fn empty_dates_sort_last_ascending() {
        let mut table = sample();
        table.sort_by("Fecha", SortDirection::Ascending);
        let ids: Vec<i64> = table.all_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn toggle_flips_direction_on_same_column() {
        let mut table = sample();
        table.toggle_sort("Precio");
        assert_eq!(table.sort().unwrap().direction, SortDirection::Ascending);
        table.toggle_sort("Precio");
        assert_eq!(table.sort().unwrap().direction, SortDirection::Descending);
        table.toggle_sort("Cantidad");
        assert_eq!(table.sort().unwrap().direction, SortDirection::Ascending);
    }

    #[test]
    fn pagination_splits_and_clamps() {
        let mut table = sample();
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.rows().len(), 2);

        table.set_page(5);
        assert_eq!(table.page(), 1);
        let rows = table.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
    }

    #[test]
    fn empty_table_has_one_page() {
        let table: Table<OrderLine> = Table::new(10);
        assert_eq!(table.page_count(), 1);
        assert!(table.rows().is_empty());
        assert!(table.render().contains("Página 1 de 1 (0 registros)"));
    }
}
