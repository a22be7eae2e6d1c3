// Example: attach a strategy to a viewport and follow the rendered range while scrolling.
use virtual_window::{
    ScrollBehavior, StrategyOptions, VariableSizeStrategy, ViewportController, ViewportHost,
    ViewportOptions,
};

struct Host {
    viewport: u32,
    offset: u64,
    len: usize,
}

impl ViewportHost for Host {
    fn viewport_size(&self) -> u32 {
        self.viewport
    }

    fn measure_scroll_offset(&self) -> u64 {
        self.offset
    }

    fn data_length(&self) -> usize {
        self.len
    }

    fn scroll_to_offset(&mut self, offset: u64, _behavior: ScrollBehavior) {
        self.offset = offset;
    }
}

fn main() -> Result<(), virtual_window::WindowError> {
    let host = Host {
        viewport: 400,
        offset: 0,
        len: 1_000_000,
    };
    let strategy = VariableSizeStrategy::new(StrategyOptions::new(|_| 24));

    let mut ctl = ViewportController::new(host, ViewportOptions::default());
    let token = ctl.attach(strategy)?;
    ctl.rendered_range_stream()
        .subscribe(|r| println!("rendered_range -> {:?}", r));
    ctl.scrolled_index_change()
        .subscribe(|i| println!("scrolled_index -> {i}"));

    println!("total_size={}", ctl.total_content_size());
    println!("rendered_range={:?}", ctl.rendered_range());

    // Several scroll events within one frame collapse into one recomputation.
    for offset in [10, 20, 30, 40] {
        ctl.host_mut().offset = offset;
        ctl.notify_scrolled();
    }
    ctl.run_frame();

    ctl.scroll_to_index(500_000, ScrollBehavior::Smooth)?;
    ctl.notify_scrolled();
    ctl.run_frame();
    println!(
        "after scroll_to_index: offset={} range={:?}",
        ctl.measure_scroll_offset(),
        ctl.rendered_range()
    );

    ctl.detach(token)?;
    Ok(())
}
