mod mailbox_ordering;
mod registry;
