use command_bus::Command;

#[derive(Command)]
#[command(output = i32)]
struct Add;

fn main() {
    let _ = Add;
}
