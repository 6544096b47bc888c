use grow_bitmap::{Bitmap, BitmapError, slot};

const SIGHUP: usize = 1;
const SIGINT: usize = 2;
const SIGTERM: usize = 15;
const SIGRTMIN: usize = 34;

fn deliver(pending: Option<&Bitmap>) {
    for signal in slot::iter_ones(pending) {
        println!("delivering signal {signal}");
    }
}

fn main() -> Result<(), BitmapError> {
    env_logger::init();

    // nothing pending yet, so nothing is allocated either
    let mut pending: Option<Bitmap> = None;
    println!("pending: {pending:?}, clear: {}", slot::isclear(pending.as_ref()));

    for signal in [SIGTERM, SIGHUP, SIGRTMIN + 3, SIGINT, SIGHUP] {
        slot::ensure_allocated(&mut pending).set(signal)?;
    }
    println!("pending: {pending:?}");

    let blocked = Bitmap::try_from_ones([SIGINT])?;
    for signal in blocked.iter_ones() {
        slot::unset(pending.as_mut(), signal);
    }
    deliver(pending.as_ref());

    slot::clear(pending.as_mut());
    println!("after delivery, clear: {}", slot::isclear(pending.as_ref()));

    if let Err(err) = slot::ensure_allocated(&mut pending).set(100_000) {
        println!("rejected: {err}");
    }
    Ok(())
}
