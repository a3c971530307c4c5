//! Contract interfaces shared across the wallet and chain modules.

use alloy::sol;

sol! {
    /// Minimal ERC-20 surface: balance reads and spend approvals.
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256);
    }

    /// On-chain agent registry.
    #[sol(rpc)]
    interface IAgentRegistry {
        function registerAgent(string calldata name) external;
        function isRegistered(address agent) external view returns (bool);
    }

    /// Game lifecycle entry points the wallet can drive.
    #[sol(rpc)]
    interface IGameManager {
        function createGame(uint256 wager) external returns (uint256 gameId);
        function joinGame(uint256 gameId) external;
    }

    /// ENS registry lookup for a node's resolver.
    #[sol(rpc)]
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    /// Reverse-record name resolver.
    #[sol(rpc)]
    interface INameResolver {
        function name(bytes32 node) external view returns (string);
    }
}
