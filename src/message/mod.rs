#![doc = r#"
The typed contents of track events.

# Hierarchy
```text
                     |--------------|
                     | TrackMessage |
                     |--------------|
             /          |          |           \
|----------------| |-------| |--------------| |-------------|
| ChannelMessage | | SysEx | | DividedSysEx | | MetaMessage |
|----------------| |-------| |--------------| |-------------|
```
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;
