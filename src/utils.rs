#[macro_export]
macro_rules! unit_short {
  ($name:expr, $($tail:tt)*) => {
    {
      log::info!("* {}",$name);
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::info!("Done  `{}` ({} ms)", $name, now.elapsed().as_millis());
      value
    }
  };
}
