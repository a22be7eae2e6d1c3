// Example: a windowed table body with two sticky header rows.
use virtual_window::{
    ListRange, ScrollBehavior, SlotFactory, StrategyOptions, ViewportHost, ViewportOptions,
    WindowError, WindowedRenderer,
};
use virtual_window_table::{StickyRows, TableWindowing};

struct Host {
    offset: u64,
    rows: usize,
}

impl ViewportHost for Host {
    fn viewport_size(&self) -> u32 {
        240
    }

    fn measure_scroll_offset(&self) -> u64 {
        self.offset
    }

    fn data_length(&self) -> usize {
        self.rows
    }

    fn scroll_to_offset(&mut self, offset: u64, _behavior: ScrollBehavior) {
        self.offset = offset;
    }
}

struct Row {
    index: usize,
    label: String,
    height: u32,
}

struct RowFactory;

impl SlotFactory<(String, u32)> for RowFactory {
    type Slot = Row;

    fn create(&mut self, index: usize, item: &(String, u32)) -> Row {
        Row {
            index,
            label: item.0.clone(),
            height: item.1,
        }
    }

    fn bind(&mut self, slot: &mut Row, index: usize, item: &(String, u32)) {
        slot.index = index;
        slot.label.clone_from(&item.0);
        slot.height = item.1;
    }

    fn destroy(&mut self, _slot: Row) {}
}

struct Headers {
    tops: [u64; 2],
    shifts: [i64; 2],
}

impl StickyRows for Headers {
    fn row_count(&self) -> usize {
        self.tops.len()
    }

    fn base_offset(&self, row: usize) -> u64 {
        self.tops[row]
    }

    fn set_shift(&mut self, row: usize, shift: i64) {
        self.shifts[row] = shift;
    }
}

fn main() -> Result<(), WindowError> {
    let data: Vec<(String, u32)> = (0..10_000)
        .map(|i| (format!("row {i}"), if i % 7 == 0 { 48 } else { 24 }))
        .collect();
    let heights: Vec<u32> = data.iter().map(|(_, h)| *h).collect();

    let host = Host {
        offset: 0,
        rows: data.len(),
    };
    let mut table = TableWindowing::new(
        host,
        ViewportOptions::default(),
        StrategyOptions::new(move |i| heights[i]),
        WindowedRenderer::with_capacity(RowFactory, 50),
    )?;
    let mut headers = Headers {
        tops: [0, 32],
        shifts: [0; 2],
    };

    for offset in [0, 500, 520, 5_000] {
        table.controller_mut().host_mut().offset = offset;
        table.notify_scrolled();
        let frame = table.run_frame(&data, &mut headers);
        println!(
            "offset={offset} range={:?} rows={:?} sticky_updated={} shifts={:?}",
            table.rendered_range(),
            frame.rows,
            frame.sticky_updated,
            headers.shifts
        );
    }

    if let Some((_, first)) = table.rows().slots().next() {
        println!("first rendered row: #{} {}", first.index, first.label);
    }
    let range = table.rendered_range();
    let body = table.measure_range_size(ListRange::new(range.start, range.start + 3), |row, _| {
        row.height
    })?;
    println!("first three rendered rows measure {body}px");

    println!("destroyed {} row slots", table.detach()?);
    Ok(())
}
