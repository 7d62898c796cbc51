use command_bus::Command;

#[derive(Command)]
#[command(result = u8)]
#[command(result = u8)]
struct Twice;

fn main() {
    let _ = Twice;
}
