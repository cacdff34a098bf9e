mod compaction;
mod modes;
