//! Records shared through `Rc<RefCell<_>>` and `Arc<Mutex<_>>`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dotfeed::Record;
use parking_lot::Mutex;

#[derive(Record, Default)]
struct Limits {
    #[dotenv("MAX_CONNECTIONS")]
    max_connections: usize,
}

fn main() {
    let local = Rc::new(RefCell::new(Limits::default()));
    dotfeed::decode_str("MAX_CONNECTIONS=8\n", &mut local.clone()).unwrap();
    assert_eq!(local.borrow().max_connections, 8);

    let shared = Arc::new(Mutex::new(Limits::default()));
    dotfeed::decode_str("MAX_CONNECTIONS=16\n", &mut shared.clone()).unwrap();
    assert_eq!(shared.lock().max_connections, 16);
}
