// SPDX-License-Identifier: MIT

//! The opcode table. Stable: these values are the contract with every SDK.

/// A syscall opcode carried in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // Core
    Noop = 0x00,
    Think = 0x01,
    Exec = 0x02,
    Read = 0x03,
    Write = 0x04,

    // Lifecycle
    Spawn = 0x10,
    Kill = 0x11,
    List = 0x12,
    Pause = 0x14,
    Resume = 0x15,

    // IPC
    Send = 0x20,
    Recv = 0x21,
    Broadcast = 0x22,
    Register = 0x23,

    // State
    Store = 0x30,
    Fetch = 0x31,
    Delete = 0x32,
    Keys = 0x33,

    // Permissions
    GetPerms = 0x40,
    SetPerms = 0x41,

    // Network
    Http = 0x50,

    // Events
    Subscribe = 0x60,
    Unsubscribe = 0x61,
    PollEvents = 0x62,
    Emit = 0x63,

    // Record/replay
    RecordStart = 0x70,
    RecordStop = 0x71,
    RecordStatus = 0x72,
    ReplayStart = 0x73,
    ReplayStatus = 0x74,

    // Audit
    GetAuditLog = 0x76,
    SetAuditConfig = 0x77,

    // World
    WorldCreate = 0xA0,
    WorldDestroy = 0xA1,
    WorldList = 0xA2,
    WorldJoin = 0xA3,
    WorldLeave = 0xA4,
    WorldEvent = 0xA5,
    WorldState = 0xA6,
    WorldSnapshot = 0xA7,
    WorldRestore = 0xA8,

    // Tunnel
    TunnelConnect = 0xB0,
    TunnelDisconnect = 0xB1,
    TunnelStatus = 0xB2,
    TunnelListRemotes = 0xB3,
    TunnelConfig = 0xB4,

    // Metrics
    MetricsSnapshot = 0xC0,
    MetricsAgent = 0xC1,
    MetricsReservedC2 = 0xC2,
    MetricsReservedC3 = 0xC3,

    Exit = 0xFF,
}

impl Opcode {
    /// Resolve a raw opcode byte, returning `None` for values with no
    /// handler. The dispatcher echoes the payload back unchanged for `None`
    /// (debug-friendly, per the spec).
    pub fn from_u8(raw: u8) -> Option<Self> {
        use Opcode::*;
        Some(match raw {
            0x00 => Noop,
            0x01 => Think,
            0x02 => Exec,
            0x03 => Read,
            0x04 => Write,
            0x10 => Spawn,
            0x11 => Kill,
            0x12 => List,
            0x14 => Pause,
            0x15 => Resume,
            0x20 => Send,
            0x21 => Recv,
            0x22 => Broadcast,
            0x23 => Register,
            0x30 => Store,
            0x31 => Fetch,
            0x32 => Delete,
            0x33 => Keys,
            0x40 => GetPerms,
            0x41 => SetPerms,
            0x50 => Http,
            0x60 => Subscribe,
            0x61 => Unsubscribe,
            0x62 => PollEvents,
            0x63 => Emit,
            0x70 => RecordStart,
            0x71 => RecordStop,
            0x72 => RecordStatus,
            0x73 => ReplayStart,
            0x74 => ReplayStatus,
            0x76 => GetAuditLog,
            0x77 => SetAuditConfig,
            0xA0 => WorldCreate,
            0xA1 => WorldDestroy,
            0xA2 => WorldList,
            0xA3 => WorldJoin,
            0xA4 => WorldLeave,
            0xA5 => WorldEvent,
            0xA6 => WorldState,
            0xA7 => WorldSnapshot,
            0xA8 => WorldRestore,
            0xB0 => TunnelConnect,
            0xB1 => TunnelDisconnect,
            0xB2 => TunnelStatus,
            0xB3 => TunnelListRemotes,
            0xB4 => TunnelConfig,
            0xC0 => MetricsSnapshot,
            0xC1 => MetricsAgent,
            0xC2 => MetricsReservedC2,
            0xC3 => MetricsReservedC3,
            0xFF => Exit,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this opcode is a pure read with no observable side effect on
    /// kernel state. Used by the execution log to decide default exclusion
    /// (§4.12) and could be reused by future read-only authorization tiers.
    pub fn is_pure_read(self) -> bool {
        matches!(
            self,
            Opcode::List
                | Opcode::GetPerms
                | Opcode::Keys
                | Opcode::PollEvents
                | Opcode::MetricsSnapshot
                | Opcode::MetricsAgent
                | Opcode::GetAuditLog
                | Opcode::TunnelStatus
                | Opcode::TunnelListRemotes
                | Opcode::WorldList
                | Opcode::WorldState
        )
    }
}
