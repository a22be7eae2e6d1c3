// Example: driving a WindowedRenderer from range changes and watching slots get recycled.
use virtual_window::{ListRange, SlotFactory, WindowedRenderer};

#[derive(Default)]
struct Labels {
    created: usize,
}

impl SlotFactory<String> for Labels {
    type Slot = String;

    fn create(&mut self, index: usize, item: &String) -> String {
        self.created += 1;
        format!("#{index} {item}")
    }

    fn bind(&mut self, slot: &mut String, index: usize, item: &String) {
        slot.clear();
        slot.push_str(&format!("#{index} {item}"));
    }

    fn destroy(&mut self, slot: String) {
        println!("destroy {slot}");
    }
}

fn main() {
    let data: Vec<String> = (0..1_000).map(|i| format!("row {i}")).collect();
    let mut renderer = WindowedRenderer::with_capacity(Labels::default(), 4);

    for range in [
        ListRange::new(0, 10),
        ListRange::new(3, 13),
        ListRange::new(500, 506),
        ListRange::new(500, 502),
    ] {
        let report = renderer.render_range(range, &data);
        println!(
            "{:?}: {:?} pooled={}",
            renderer.rendered_range(),
            report,
            renderer.cache().len()
        );
    }

    for (_, slot) in renderer.slots() {
        println!("live {slot}");
    }
    let created = renderer.factory().created;
    let torn_down = renderer.teardown();
    println!("created={created} torn_down={torn_down}");
}
