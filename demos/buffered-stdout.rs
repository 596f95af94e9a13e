use std::io::IoSlice;

use gatherv::{BufferedWriter, Target};

fn main() -> gatherv::Result<()> {
    let header = b"== buffered stdout ==\n";

    let stdout = std::io::stdout();
    let mut writer = BufferedWriter::with_capacity(Target::Other(&stdout), 4)?;

    let lines: Vec<String> = (1..=5).map(|n| format!("line {} of 5\n", n)).collect();
    let mut batch = writer.batch();
    batch.write_slice(IoSlice::new(header))?;
    let mut written = 0;
    for line in &lines {
        written += batch.write_bytes(line.as_bytes())?;
    }
    written += batch.flush()?;
    drop(batch);

    for round in 1..=2 {
        let footer = format!("-- round {} done --\n", round);
        let mut batch = writer.batch();
        batch.write_bytes(footer.as_bytes())?;
        written += batch.flush()?;
    }

    eprintln!("{} bytes written", written);
    Ok(())
}
