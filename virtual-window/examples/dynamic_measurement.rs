// Example: feeding measured sizes back into the strategy.
use virtual_window::{
    ScrollBehavior, StrategyOptions, VariableSizeStrategy, ViewportController, ViewportHost,
    ViewportOptions, WindowError,
};

struct Host {
    offset: u64,
}

impl ViewportHost for Host {
    fn viewport_size(&self) -> u32 {
        30
    }

    fn measure_scroll_offset(&self) -> u64 {
        self.offset
    }

    fn data_length(&self) -> usize {
        100
    }

    fn scroll_to_offset(&mut self, offset: u64, _behavior: ScrollBehavior) {
        self.offset = offset;
    }
}

fn main() -> Result<(), WindowError> {
    // Estimate every row at 10 px, with a small buffer band.
    let options = StrategyOptions::new(|_| 10).with_buffers(10, 20);
    let mut ctl = ViewportController::new(Host { offset: 200 }, ViewportOptions::default());
    let _token = ctl.attach(VariableSizeStrategy::new(options))?;

    println!(
        "before: total={} range={:?}",
        ctl.total_content_size(),
        ctl.rendered_range()
    );

    // The host rendered rows 19..24 and measured them.
    for (index, size) in [(19, 12), (20, 30), (21, 8), (22, 25), (23, 10)] {
        ctl.with_strategy(|s, vp| s.update_item_size(index, size, vp))?;
    }
    println!(
        "after measuring: total={} range={:?} offset_to_start={:?}",
        ctl.total_content_size(),
        ctl.rendered_range(),
        ctl.offset_to_rendered_content_start()
    );

    // Scrolling uses the measured offsets.
    ctl.scroll_to_index(22, ScrollBehavior::Instant)?;
    ctl.notify_scrolled();
    ctl.run_frame();
    println!(
        "scroll_to_index(22): off={} range={:?}",
        ctl.measure_scroll_offset(),
        ctl.rendered_range()
    );
    Ok(())
}
