//! The three canonical profiles, built in code rather than loaded from
//! disk so the gradation invariant (`default < quarantine < strict`) is
//! checkable without touching the filesystem. [`super::library::ProfileLibrary`]
//! still exposes them as if read from an embedded resource bundle.

use super::types::{Action, Profile, RuleGroup};

/// Only the bare minimum a sandboxed workload should never do, even
/// unconfined.
pub fn default_profile() -> Profile {
    Profile::new(
        Action::Allow,
        vec![RuleGroup::new(
            ["reboot", "init_module", "finit_module", "delete_module"],
            Action::Errno,
        )],
    )
}

/// The standard quarantine regime: no networking, no process
/// introspection, no kernel/module/mount manipulation.
pub fn quarantine_profile() -> Profile {
    Profile::new(
        Action::Allow,
        vec![
            RuleGroup::new(
                [
                    "socket", "bind", "connect", "listen", "accept", "accept4", "sendto",
                    "sendmsg", "recvfrom", "recvmsg",
                ],
                Action::Errno,
            ),
            RuleGroup::new(
                ["ptrace", "process_vm_readv", "process_vm_writev"],
                Action::Errno,
            ),
            RuleGroup::new(["init_module", "finit_module", "delete_module"], Action::Errno),
            RuleGroup::new(
                [
                    "reboot", "swapon", "swapoff", "mount", "umount", "umount2", "pivot_root",
                    "chroot",
                ],
                Action::Errno,
            ),
        ],
    )
}

/// Strict superset of [`quarantine_profile`]: additionally denies
/// permission/ownership mutation, SysV IPC, and capability/credential
/// mutators.
pub fn quarantine_strict_profile() -> Profile {
    let mut profile = quarantine_profile();
    profile.rule_groups.push(RuleGroup::new(
        ["chmod", "fchmod", "fchmodat"],
        Action::Errno,
    ));
    profile.rule_groups.push(RuleGroup::new(
        ["chown", "fchown", "lchown", "fchownat"],
        Action::Errno,
    ));
    profile.rule_groups.push(RuleGroup::new(
        [
            "msgget", "msgsnd", "msgrcv", "msgctl", "semget", "semop", "semctl", "shmget",
            "shmat", "shmdt", "shmctl",
        ],
        Action::Errno,
    ));
    profile.rule_groups.push(RuleGroup::new(
        [
            "capset", "setreuid", "setresuid", "setuid", "setregid", "setresgid", "setgid",
            "setfsuid", "setfsgid",
        ],
        Action::Errno,
    ));
    profile
}
