/// Selection policy. Every variant currently drains the ready queue
/// head (the queue already encodes priority and FIFO within a level);
/// the tag records intent so richer selectors can slot in later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedPolicy {
    RoundRobin,
    Priority,
    PriorityRr,
    Fcfs,
}

impl SchedPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedPolicy::RoundRobin => "round_robin",
            SchedPolicy::Priority => "priority",
            SchedPolicy::PriorityRr => "priority_rr",
            SchedPolicy::Fcfs => "fcfs",
        }
    }

    pub fn parse(token: &str) -> Option<SchedPolicy> {
        let t = token.trim();
        if t.eq_ignore_ascii_case("round_robin") || t.eq_ignore_ascii_case("rr") {
            Some(SchedPolicy::RoundRobin)
        } else if t.eq_ignore_ascii_case("priority") {
            Some(SchedPolicy::Priority)
        } else if t.eq_ignore_ascii_case("priority_rr") || t.eq_ignore_ascii_case("prr") {
            Some(SchedPolicy::PriorityRr)
        } else if t.eq_ignore_ascii_case("fcfs") {
            Some(SchedPolicy::Fcfs)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_tokens_round_trip() {
        for p in [
            SchedPolicy::RoundRobin,
            SchedPolicy::Priority,
            SchedPolicy::PriorityRr,
            SchedPolicy::Fcfs,
        ] {
            assert_eq!(SchedPolicy::parse(p.as_str()), Some(p));
        }
        assert_eq!(SchedPolicy::parse("RR"), Some(SchedPolicy::RoundRobin));
        assert_eq!(SchedPolicy::parse("lottery"), None);
    }
}
