//! Static table of every remote method with its required permission.

use std::fmt;
use std::str::FromStr;

use openrpc_types::node::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Single request, single response.
    Call,
    /// Single request which blocks until a node-side condition holds.
    /// Only the caller's context bounds it.
    Wait,
    /// Opens a channel of values pushed by the node.
    Subscription,
}

macro_rules! declare_rpc_methods {
    (@kind) => { MethodKind::Call };
    (@kind Wait) => { MethodKind::Wait };
    (@kind Subscription) => { MethodKind::Subscription };
    (
        $(
            $(#[$group_meta:meta])*
            $group:ident($group_name:literal) {
                $(
                    $method:ident($slot:literal): $perm:ident $(+ $kind:ident)?
                ),*$(,)?
            }
        )*
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MethodGroup {
            $($(#[$group_meta])* $group,)*
        }

        impl MethodGroup {
            pub const ALL: &'static [Self] = &[$(Self::$group,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$group => $group_name,)*
                }
            }

            pub fn methods(self) -> impl Iterator<Item = Method> {
                Method::ALL.iter().copied().filter(move |m| m.group() == self)
            }
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Method {
            $($($method,)*)*
        }

        impl Method {
            pub const ALL: &'static [Self] = &[$($(Self::$method,)*)*];

            /// Wire name, `<group>.<Slot>`.
            pub const fn name(self) -> &'static str {
                match self {
                    $($(Self::$method => concat!($group_name, ".", $slot),)*)*
                }
            }

            pub const fn slot(self) -> &'static str {
                match self {
                    $($(Self::$method => $slot,)*)*
                }
            }

            pub const fn group(self) -> MethodGroup {
                match self {
                    $($(Self::$method => MethodGroup::$group,)*)*
                }
            }

            /// Minimal credential level the node accepts for this method.
            pub const fn permission(self) -> Permission {
                match self {
                    $($(Self::$method => Permission::$perm,)*)*
                }
            }

            pub const fn kind(self) -> MethodKind {
                match self {
                    $($(Self::$method => declare_rpc_methods!(@kind $($kind)?),)*)*
                }
            }
        }
    };
}

declare_rpc_methods! {
    Fraud("fraud") {
        FraudSubscribe("Subscribe"): Read + Subscription,
        FraudGet("Get"): Read,
    }
    Das("das") {
        DasSamplingStats("SamplingStats"): Read,
        DasWaitCatchUp("WaitCatchUp"): Read + Wait,
    }
    Blob("blob") {
        BlobSubmit("Submit"): Write,
        BlobGet("Get"): Read,
        BlobGetAll("GetAll"): Read,
        BlobGetProof("GetProof"): Read,
        BlobIncluded("Included"): Read,
    }
    Header("header") {
        HeaderLocalHead("LocalHead"): Read,
        HeaderGetByHash("GetByHash"): Read,
        HeaderGetVerifiedRangeByHeight("GetVerifiedRangeByHeight"): Read,
        HeaderGetByHeight("GetByHeight"): Read,
        HeaderSyncState("SyncState"): Read,
        HeaderSyncWait("SyncWait"): Read + Wait,
        HeaderNetworkHead("NetworkHead"): Read,
        HeaderSubscribe("Subscribe"): Read + Subscription,
    }
    State("state") {
        StateAccountAddress("AccountAddress"): Read,
        StateIsStopped("IsStopped"): Read,
        StateBalance("Balance"): Read,
        StateBalanceForAddress("BalanceForAddress"): Read,
        StateTransfer("Transfer"): Write,
        StateSubmitTx("SubmitTx"): Write,
        StateSubmitPayForBlob("SubmitPayForBlob"): Write,
        StateCancelUnbondingDelegation("CancelUnbondingDelegation"): Write,
        StateBeginRedelegate("BeginRedelegate"): Write,
        StateUndelegate("Undelegate"): Write,
        StateDelegate("Delegate"): Write,
        StateQueryDelegation("QueryDelegation"): Read,
        StateQueryUnbonding("QueryUnbonding"): Read,
        StateQueryRedelegations("QueryRedelegations"): Read,
    }
    Share("share") {
        ShareSharesAvailable("SharesAvailable"): Read,
        ShareGetShare("GetShare"): Read,
        ShareGetEds("GetEDS"): Read,
        ShareGetSharesByNamespace("GetSharesByNamespace"): Read,
    }
    P2p("p2p") {
        P2pPeers("Peers"): Admin,
        P2pPeerInfo("PeerInfo"): Admin,
        P2pConnect("Connect"): Admin,
        P2pClosePeer("ClosePeer"): Admin,
        P2pConnectedness("Connectedness"): Admin,
        P2pNatStatus("NATStatus"): Admin,
        P2pBlockPeer("BlockPeer"): Admin,
        P2pUnblockPeer("UnblockPeer"): Admin,
        P2pListBlockedPeers("ListBlockedPeers"): Admin,
        P2pProtect("Protect"): Admin,
        P2pUnprotect("Unprotect"): Admin,
        P2pIsProtected("IsProtected"): Admin,
        P2pBandwidthStats("BandwidthStats"): Admin,
        P2pBandwidthForPeer("BandwidthForPeer"): Admin,
        P2pBandwidthForProtocol("BandwidthForProtocol"): Admin,
        P2pResourceState("ResourceState"): Admin,
        P2pPubSubPeers("PubSubPeers"): Admin,
    }
    Node("node") {
        NodeInfo("Info"): Admin,
        NodeLogLevelSet("LogLevelSet"): Admin,
        NodeAuthVerify("AuthVerify"): Admin,
        NodeAuthNew("AuthNew"): Admin,
    }
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    pub const fn is_subscription(self) -> bool {
        matches!(self.kind(), MethodKind::Subscription)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownMethod(s.to_owned()))
    }
}

impl fmt::Display for MethodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethod(pub String);
