//! Generic records get their bounds from the fields that use the parameter.

use dotfeed::Record;

#[derive(Record, Default)]
struct Setting<T> {
    #[dotenv("VALUE")]
    value: T,
}

#[derive(Record, Default)]
struct Outer<R> {
    inner: R,
}

fn main() {
    let mut number = Setting::<u64>::default();
    dotfeed::decode_str("VALUE=42\n", &mut number).unwrap();
    assert_eq!(number.value, 42);

    let mut outer = Outer::<Setting<String>>::default();
    dotfeed::decode_str("VALUE=text\n", &mut outer).unwrap();
    assert_eq!(outer.inner.value, "text");
}
